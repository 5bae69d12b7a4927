//! Board rendering
//!
//! Cards, the empty-state placeholder and the standalone page are Handlebars
//! templates. Every `{{field}}` expansion is HTML-escaped by the engine, so
//! record text can never become markup. Only the pre-rendered card list is
//! inserted raw into the page.
//!
//! Template loading chain:
//! 1. `<templates-dir>/{name}.hbs` (user override)
//! 2. Embedded default

pub mod embedded;
mod renderer;
mod text;

pub use renderer::{EmptyState, PageContext, Renderer};
pub use text::render_text;

/// Button label before copying
pub const COPY_LABEL: &str = "Copy";

/// Button label while the copy feedback is showing
pub const COPIED_LABEL: &str = "Copied";
