use crate::source::{ContentId, Document, FlatLineSource, Line, Rect, TextSource};

/// Metrics used to place plain text on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainTextLayout {
    pub line_height: i32,
    pub char_width: i32,
    pub margin: i32,
}

impl Default for PlainTextLayout {
    fn default() -> Self {
        Self {
            line_height: 16,
            char_width: 8,
            margin: 4,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LineSpan {
    start: usize,
    len: usize,
}

/// A plain text document split into lines at `\n`.
///
/// A `\r` before the newline is not part of the line.
#[derive(Debug)]
pub struct PlainText {
    id: ContentId,
    data: String,
    lines: Vec<LineSpan>,
    layout: PlainTextLayout,
}

impl PlainText {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_layout(text, PlainTextLayout::default())
    }

    pub fn with_layout(text: impl Into<String>, layout: PlainTextLayout) -> Self {
        let data = text.into();
        let lines = split_lines(data.as_bytes());
        Self {
            id: ContentId::fresh(),
            data,
            lines,
            layout,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Zero-based line containing byte `offset`; offsets past the end map
    /// to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1)
    }

    /// Width of the widest line including both margins.
    pub fn formatted_width(&self) -> i32 {
        let widest = self
            .lines
            .iter()
            .map(|line| columns(&self.data.as_bytes()[line.start..line.start + line.len]))
            .max()
            .unwrap_or(0);
        2 * self.layout.margin + px(widest).saturating_mul(self.layout.char_width)
    }

    fn column_x(&self, line: LineSpan, offset: usize) -> i32 {
        let end = offset.clamp(line.start, line.start + line.len);
        let cols = columns(&self.data.as_bytes()[line.start..end]);
        self.layout.margin + px(cols).saturating_mul(self.layout.char_width)
    }

    fn line_top(&self, line: usize) -> i32 {
        self.layout.margin + px(line).saturating_mul(self.layout.line_height)
    }
}

impl FlatLineSource for PlainText {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<Line<'_>> {
        let span = self.lines.get(index)?;
        Some(Line {
            text: &self.data.as_bytes()[span.start..span.start + span.len],
            offset: span.start,
        })
    }

    fn coords_from_range(&self, start: usize, end: usize) -> Rect {
        let first = self.line_of(start);
        let y0 = self.line_top(first);

        let Some(&line) = self.lines.get(first) else {
            return Rect {
                x0: 0,
                y0,
                x1: 0,
                y1: y0 + self.layout.line_height,
            };
        };

        if end <= line.start + line.len {
            Rect {
                x0: self.column_x(line, start),
                y0,
                x1: self.column_x(line, end),
                y1: y0 + self.layout.line_height,
            }
        } else {
            let last = self.line_of(end);
            Rect {
                x0: 0,
                y0,
                x1: self.formatted_width(),
                y1: self.line_top(last + 1),
            }
        }
    }
}

impl Document for PlainText {
    fn content_id(&self) -> ContentId {
        self.id
    }

    fn text_source(&self) -> TextSource<'_> {
        TextSource::Flat(self)
    }
}

fn split_lines(data: &[u8]) -> Vec<LineSpan> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &b) in data.iter().enumerate() {
        if b == b'\n' {
            lines.push(line_span(data, start, i));
            start = i + 1;
        }
    }
    if start < data.len() {
        lines.push(line_span(data, start, data.len()));
    }

    lines
}

fn line_span(data: &[u8], start: usize, end: usize) -> LineSpan {
    let end = if end > start && data[end - 1] == b'\r' { end - 1 } else { end };
    LineSpan {
        start,
        len: end - start,
    }
}

/// Number of characters in a UTF-8 byte slice, counting a split sequence
/// by its lead byte.
fn columns(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b & 0xC0 != 0x80).count()
}

fn px(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
