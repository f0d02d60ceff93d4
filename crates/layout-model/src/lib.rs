//! Editable in-memory model of a report-layout document.
//!
//! The layout is deeply nested, partially re-encoded JSON: some fields hold
//! JSON text that must be decoded before editing and re-encoded verbatim
//! before persistence. This crate keeps a faithful, round-trippable mirror
//! of that document and exposes it through a declarative, type-checked
//! attribute surface:
//!
//! - [`layered`] - the two-state (text vs. structured) layered fields;
//! - [`schema`] - static attribute-mapping tables per visual kind;
//! - [`visual`] - the record node with get/set, fan-out writes, and typed
//!   variants selected by discriminator;
//! - [`collection`] - position/id addressing over ordered visuals;
//! - [`bookmark`] - building and parsing the cross-page bookmark aggregate;
//! - [`report`] - the document root orchestrating load, edit, and persist.
//!
//! Everything is single-threaded and synchronous; callers serialize access
//! to a shared [`report::Report`].

pub mod bookmark;
pub mod collection;
pub mod error;
pub mod field;
pub mod id;
pub mod layered;
pub mod page;
pub mod report;
pub mod schema;
pub mod templates;
pub mod visual;

pub use bookmark::{Bookmark, BookmarkEntry, BookmarkGroup, BookmarkSummary, DisplayMode};
pub use collection::VisualCollection;
pub use error::ModelError;
pub use field::{AttrValue, FieldRef};
pub use page::{Page, PageSummary};
pub use report::{BookmarkSpec, Report};
pub use visual::{ExportedVisual, Visual, VisualSummary};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
