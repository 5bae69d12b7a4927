//! Promptboard - a prompt-sharing board for teachers
//!
//! Teachers browse a shared catalog of classroom prompts, narrow it down by
//! school type, subject or free text, copy a prompt with one click, and share
//! their own prompts. Shared prompts are stored on the local machine only and
//! shown ahead of older catalog entries.
//!
//! # Architecture
//!
//! ```text
//!   static catalog ──┐                       ┌── render (HTML cards / page)
//!   (file or HTTP)   ├─ PromptStore ─ Board ─┼── filter / facets
//!   local storage ───┘    (merge)            ├── submit ─> local storage
//!                                            └── copy ───> clipboard
//! ```
//!
//! The store, filter and submission logic live in the `promptstore` crate;
//! this crate adds rendering, the clipboard helper, user notices, the board
//! controller that ties them together, configuration, and the `pb` CLI.

pub mod board;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod notify;
pub mod render;

pub use board::{Board, BoardStatus, LOAD_FAILED_MESSAGE};
pub use clipboard::{Clipboard, ClipboardError, CopyTrigger, MemoryClipboard, SystemClipboard, TriggerState};
pub use config::Config;
pub use notify::{ConsoleNotifier, Notice, Notifier, RecordingNotifier};
pub use render::{EmptyState, PageContext, Renderer, render_text};

/// Milliseconds a copy button shows "Copied" before reverting
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;
