//! PromptStore - local-first prompt catalog
//!
//! Merges a static, externally supplied prompt catalog with prompts submitted
//! on this machine, and provides the filter predicate used by the board.
//!
//! # Architecture
//!
//! ```text
//! StaticSource (http/file) ──┐
//!                            ├─► PromptStore::load ─► merge (local first, newest first)
//! LocalStorage[key] ─────────┘           ▲
//!                                        │
//!            PromptStore::submit ────────┘ (prepend + rewrite the whole slot)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptstore::{FileSource, FileStorage, FilterQuery, PromptStore, filter};
//!
//! let store = PromptStore::new(
//!     Arc::new(FileSource::new("data/prompts.json")),
//!     Arc::new(FileStorage::open(".promptboard")?),
//! );
//! let all = store.load().await?;
//! let hits = filter(&all, &FilterQuery::default().with_text("作文"));
//! ```

mod error;
mod filter;
mod import;
mod record;
mod source;
mod storage;
mod store;
mod submit;

pub use error::{StoreError, StoreResult};
pub use filter::{Facets, FilterQuery, facets, filter};
pub use import::{import_tsv, import_tsv_file, school_label, write_catalog};
pub use record::{PromptRecord, format_timestamp, parse_timestamp};
pub use source::{FileSource, HttpSource, MemorySource, StaticSource, open_source};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
pub use store::{PromptStore, merge};
pub use submit::{Clock, FixedClock, PromptForm, SubmitOutcome, SystemClock, local_id};

/// Storage key holding the locally submitted prompts
pub const DEFAULT_STORAGE_KEY: &str = "teacherPrompts";

/// Prefix of identifiers generated for locally submitted prompts
pub const LOCAL_ID_PREFIX: &str = "local-";
