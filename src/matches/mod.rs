//! The ordered list of matches found by a search, and the cursor into it.
//!
//! The list lives behind a `RefCell` because highlight teardown may call
//! back into the GUI, which in turn may query the list while it is being
//! emptied. Every operation that drops or creates highlights does so with
//! no borrow held.

use serde::Serialize;
use std::cell::RefCell;

use crate::error::Result;
use crate::source::NodeId;

/// A visual emphasis over a match, owned by its match record.
///
/// Dropping the highlight removes it from view.
pub trait Highlight {
    /// The part of the run `[start, end)` covered by this highlight, as
    /// offsets relative to `start`, or `None` if they do not overlap.
    fn highlighted(&self, start: usize, end: usize) -> Option<(usize, usize)>;
}

/// A snapshot of one match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    /// Document byte offset of the first matched byte
    pub start: usize,

    /// Document byte offset one past the last matched byte
    pub end: usize,

    /// Node holding the start of the match, structured documents only
    pub start_anchor: Option<NodeId>,

    /// Node holding the end of the match, structured documents only
    pub end_anchor: Option<NodeId>,

    /// Whether the record currently carries a highlight
    pub highlighted: bool,
}

/// One located occurrence of the search pattern.
pub struct MatchRecord {
    start: usize,
    end: usize,
    start_anchor: Option<NodeId>,
    end_anchor: Option<NodeId>,
    highlight: Option<Box<dyn Highlight>>,
}

impl MatchRecord {
    fn span(&self) -> MatchSpan {
        MatchSpan {
            start: self.start,
            end: self.end,
            start_anchor: self.start_anchor,
            end_anchor: self.end_anchor,
            highlighted: self.highlight.is_some(),
        }
    }
}

#[derive(Default)]
struct Matches {
    records: Vec<MatchRecord>,
    current: Option<usize>,
}

/// Matches in document order plus the current-match cursor.
#[derive(Default)]
pub struct MatchList {
    inner: RefCell<Matches>,
}

impl MatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a match at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NoMemory`](crate::error::SearchError::NoMemory)
    /// if the list cannot grow.
    pub fn add_entry(
        &self,
        start: usize,
        end: usize,
        start_anchor: Option<NodeId>,
        end_anchor: Option<NodeId>,
    ) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        debug_assert!(inner.records.last().is_none_or(|last| last.start <= start));

        inner.records.try_reserve(1)?;
        inner.records.push(MatchRecord {
            start,
            end,
            start_anchor,
            end_anchor,
            highlight: None,
        });
        Ok(())
    }

    /// Removes every match and destroys their highlights.
    ///
    /// The list is emptied before any highlight is dropped, so anything a
    /// highlight's teardown triggers sees an empty list.
    pub fn free_matches(&self) {
        let detached = {
            let mut inner = self.inner.borrow_mut();
            inner.current = None;
            std::mem::take(&mut inner.records)
        };

        drop(detached);
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().records.is_empty()
    }

    /// Snapshots of all matches in document order.
    pub fn spans(&self) -> Vec<MatchSpan> {
        self.inner.borrow().records.iter().map(MatchRecord::span).collect()
    }

    pub fn get(&self, index: usize) -> Option<MatchSpan> {
        self.inner.borrow().records.get(index).map(MatchRecord::span)
    }

    /// The match under the cursor.
    pub fn current(&self) -> Option<MatchSpan> {
        let inner = self.inner.borrow();
        inner.current.and_then(|i| inner.records.get(i)).map(MatchRecord::span)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.inner.borrow().current
    }

    /// Places the cursor on the first match, or clears it if there is none.
    pub fn select_first(&self) -> Option<MatchSpan> {
        let mut inner = self.inner.borrow_mut();
        inner.current = if inner.records.is_empty() { None } else { Some(0) };
        inner.current.map(|i| inner.records[i].span())
    }

    /// Moves the cursor one match forwards or backwards.
    ///
    /// The cursor stays put at either end of the list and when unset.
    /// Returns whether it moved.
    pub fn step(&self, forwards: bool) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(current) = inner.current else {
            return false;
        };

        let target = if forwards {
            Some(current + 1).filter(|&i| i < inner.records.len())
        } else {
            current.checked_sub(1)
        };

        match target {
            Some(index) => {
                inner.current = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.inner.borrow().current.is_some_and(|i| i > 0)
    }

    pub fn has_next(&self) -> bool {
        let inner = self.inner.borrow();
        inner.current.is_some_and(|i| i + 1 < inner.records.len())
    }

    /// Highlights every match when `all` is set, otherwise only the current
    /// one.
    ///
    /// Highlights are created lazily through `create`. A failed creation
    /// leaves that record unhighlighted; the remaining records are still
    /// processed and the first error is returned.
    pub fn show_all<F>(&self, all: bool, mut create: F) -> Result<()>
    where
        F: FnMut(&MatchSpan) -> Result<Box<dyn Highlight>>,
    {
        let (stale, wanted) = {
            let mut inner = self.inner.borrow_mut();
            let current = inner.current;
            let mut stale = Vec::new();
            let mut wanted = Vec::new();

            for (index, record) in inner.records.iter_mut().enumerate() {
                if all || current == Some(index) {
                    if record.highlight.is_none() {
                        wanted.push((index, record.span()));
                    }
                } else if let Some(highlight) = record.highlight.take() {
                    stale.push(highlight);
                }
            }
            (stale, wanted)
        };
        drop(stale);

        let mut outcome = Ok(());
        for (index, span) in wanted {
            let highlight = match create(&span) {
                Ok(highlight) => highlight,
                Err(e) => {
                    if outcome.is_ok() {
                        outcome = Err(e);
                    }
                    continue;
                }
            };

            // the list may have been rebuilt by a callback during `create`
            let orphan = {
                let mut inner = self.inner.borrow_mut();
                match inner.records.get_mut(index) {
                    Some(record) if record.start == span.start && record.end == span.end => {
                        record.highlight = Some(highlight);
                        None
                    }
                    _ => Some(highlight),
                }
            };
            drop(orphan);
        }

        outcome
    }

    /// Finds the highlighted part of the run `[start, end)`.
    ///
    /// Returns the covered sub-range relative to `start` from the first
    /// highlighted match overlapping the run.
    pub fn is_highlighted(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let inner = self.inner.borrow();
        inner
            .records
            .iter()
            .filter_map(|record| record.highlight.as_ref())
            .find_map(|highlight| highlight.highlighted(start, end))
    }
}
