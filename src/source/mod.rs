//! Document text sources and the walkers that feed them to the matcher.
//!
//! A document is either structured (a tree of positioned text boxes) or
//! flat (a sequence of plain text lines). Both expose their text as a lazy
//! stream of [`TextRun`]s in document order, which is all the walkers need.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::Selection;
use crate::error::Result;
use crate::matches::{Highlight, MatchSpan};

mod walk;

pub use walk::{find_occurrences, find_occurrences_html, find_occurrences_text};

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a node of a structured document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Identity of a document.
///
/// Sessions remember the identity of the document they searched rather
/// than the document itself, so the document may be destroyed at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(u64);

impl ContentId {
    /// Allocates an identity no other document in this process has.
    pub fn fresh() -> Self {
        ContentId(NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A rectangle in document coordinates, `x1`/`y1` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// One line of a flat document.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// The line's bytes, without its terminator
    pub text: &'a [u8],

    /// Byte offset of the line's first byte within the document
    pub offset: usize,
}

/// A contiguous run of document text handed to the pattern matcher.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a [u8],

    /// Document-wide byte offset of `text[0]`
    pub offset: usize,

    /// Node the run belongs to; `None` for flat documents
    pub anchor: Option<NodeId>,
}

/// Read access to a tree of text boxes.
pub trait StructuredSource {
    /// Root of the laid out tree, `None` before layout exists.
    fn root(&self) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Text carried by `node`, if any.
    fn text(&self, node: NodeId) -> Option<&[u8]>;

    /// Document-wide byte offset of the node's first text byte.
    fn byte_offset(&self, node: NodeId) -> usize;

    /// True when the node is replaced by an embedded object and so has no
    /// searchable text even if it carries some.
    fn is_replaced(&self, node: NodeId) -> bool;

    /// Absolute position of the node's top-left corner.
    fn coords(&self, node: NodeId) -> (i32, i32);

    /// Width and height of the node.
    fn size(&self, node: NodeId) -> (i32, i32);
}

/// Read access to a document made of plain text lines.
pub trait FlatLineSource {
    fn line_count(&self) -> usize;

    /// The zero-based line `index`, or `None` past the end.
    fn line(&self, index: usize) -> Option<Line<'_>>;

    /// Bounding rectangle of the byte range `[start, end)`.
    fn coords_from_range(&self, start: usize, end: usize) -> Rect;
}

/// The two kinds of searchable document.
#[derive(Clone, Copy)]
pub enum TextSource<'a> {
    Structured(&'a dyn StructuredSource),
    Flat(&'a dyn FlatLineSource),
}

impl<'a> TextSource<'a> {
    /// Streams the document's text runs in document order.
    pub fn runs(&self) -> TextRuns<'a> {
        match *self {
            TextSource::Structured(source) => TextRuns::Structured(StructuredRuns::new(source)),
            TextSource::Flat(source) => TextRuns::Flat(FlatRuns { source, line: 0 }),
        }
    }

    /// Region to scroll into view for a match.
    ///
    /// Structured matches span from the start anchor's corner to the far
    /// corner of the end anchor. Returns `None` for a structured match
    /// without anchors.
    pub fn match_bounds(&self, span: &MatchSpan) -> Option<Rect> {
        match *self {
            TextSource::Structured(source) => {
                let (start, end) = (span.start_anchor?, span.end_anchor?);
                let (x0, y0) = source.coords(start);
                let (x1, y1) = source.coords(end);
                let (width, height) = source.size(end);
                Some(Rect {
                    x0,
                    y0,
                    x1: x1 + width,
                    y1: y1 + height,
                })
            }
            TextSource::Flat(source) => Some(source.coords_from_range(span.start, span.end)),
        }
    }
}

/// A searchable document.
pub trait Document {
    fn content_id(&self) -> ContentId;

    fn text_source(&self) -> TextSource<'_>;

    /// Creates the highlight shown over a match.
    ///
    /// The default is a plain [`Selection`] of the match's byte range.
    fn create_highlight(&self, span: &MatchSpan) -> Result<Box<dyn Highlight>> {
        let mut selection = Selection::new();
        selection.set_position(span.start, span.end);
        Ok(Box::new(selection))
    }
}

/// Iterator over the text runs of a [`TextSource`].
pub enum TextRuns<'a> {
    Structured(StructuredRuns<'a>),
    Flat(FlatRuns<'a>),
}

impl<'a> Iterator for TextRuns<'a> {
    type Item = TextRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            TextRuns::Structured(runs) => runs.next(),
            TextRuns::Flat(runs) => runs.next(),
        }
    }
}

/// Pre-order traversal of a structured source yielding its text boxes.
pub struct StructuredRuns<'a> {
    source: &'a dyn StructuredSource,
    root: Option<NodeId>,
    pending: Vec<NodeId>,
}

impl<'a> StructuredRuns<'a> {
    fn new(source: &'a dyn StructuredSource) -> Self {
        let root = source.root();
        Self {
            source,
            root,
            pending: root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for StructuredRuns<'a> {
    type Item = TextRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.pending.pop() {
            // siblings of the root are outside the searched tree
            if Some(node) != self.root {
                if let Some(sibling) = self.source.next_sibling(node) {
                    self.pending.push(sibling);
                }
            }
            if let Some(child) = self.source.first_child(node) {
                self.pending.push(child);
            }

            if self.source.is_replaced(node) {
                continue;
            }
            if let Some(text) = self.source.text(node) {
                return Some(TextRun {
                    text,
                    offset: self.source.byte_offset(node),
                    anchor: Some(node),
                });
            }
        }
        None
    }
}

/// Line-by-line traversal of a flat source.
pub struct FlatRuns<'a> {
    source: &'a dyn FlatLineSource,
    line: usize,
}

impl<'a> Iterator for FlatRuns<'a> {
    type Item = TextRun<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.line < self.source.line_count() {
            let index = self.line;
            self.line += 1;
            if let Some(line) = self.source.line(index) {
                return Some(TextRun {
                    text: line.text,
                    offset: line.offset,
                    anchor: None,
                });
            }
        }
        None
    }
}
