//! # Textsearch
//!
//! Incremental free text search for document viewers.
//!
//! ## Features
//!
//! * Wildcard matching - `*` matches any run of bytes, `#` any single byte
//! * Match lists - every occurrence in document order, with a cursor that
//!   steps forwards and backwards
//! * Structured and plain documents - box trees and line-based text are
//!   searched through one interface
//! * Sessions - repeated requests for the same query step through the
//!   existing matches instead of searching again

/// Error types
pub mod error;
/// Ready-made box tree and plain text documents
pub mod document;
/// The ordered match list and its cursor
pub mod matches;
/// Wildcard pattern matching
pub mod pattern;
/// Search session controller
pub mod session;
/// Document text sources and walkers
pub mod source;
/// Logging setup
pub mod telemetry;

pub use error::{Result, SearchError};
pub use session::{SearchEvent, SearchObserver, SearchOptions, SearchOutcome, SearchSession};
