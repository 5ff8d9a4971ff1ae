use crate::matches::Highlight;

/// A byte range selected within a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
    defined: bool,
}

impl Selection {
    /// An empty, undefined selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, start: usize, end: usize) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.start = start;
        self.end = end;
        self.defined = start < end;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn range(&self) -> Option<(usize, usize)> {
        self.defined.then_some((self.start, self.end))
    }
}

impl Highlight for Selection {
    fn highlighted(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if !self.defined || end <= self.start || start >= self.end {
            return None;
        }

        let from = self.start.saturating_sub(start);
        let to = end.min(self.end) - start;
        Some((from, to))
    }
}
