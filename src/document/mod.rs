//! Ready-made documents for the search engine.
//!
//! [`BoxTree`] models laid out structured content, [`PlainText`] a plain
//! text view, and [`Selection`] the highlight both use by default.

mod boxes;
mod plain;
mod selection;

pub use boxes::{BoxTree, BoxTreeBuilder, Geometry};
pub use plain::{PlainText, PlainTextLayout};
pub use selection::Selection;
