//! Error types for the search subsystem.

/// Failures that abort a search build.
///
/// Degenerate queries, stale content and an exhausted backtrack stack are
/// not represented here; they are ordinary outcomes of a search request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("out of memory while building the match list")]
    NoMemory,

    #[error("document has no layout to search")]
    NoLayout,

    #[error("highlight error: {0}")]
    Highlight(String),
}

impl From<std::collections::TryReserveError> for SearchError {
    fn from(_: std::collections::TryReserveError) -> Self {
        SearchError::NoMemory
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
