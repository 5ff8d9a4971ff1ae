use crate::source::{ContentId, Document, NodeId, StructuredSource, TextSource};

/// Position relative to the parent box, and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct BoxNode {
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    text: Option<String>,
    byte_offset: usize,
    object: bool,
    geometry: Geometry,
}

/// A laid out tree of text boxes.
///
/// Node ids are handed out in document order: the n-th box added by the
/// builder is `NodeId(n)`.
#[derive(Debug)]
pub struct BoxTree {
    id: ContentId,
    nodes: Vec<BoxNode>,
    root: Option<NodeId>,
}

impl BoxTree {
    pub fn builder() -> BoxTreeBuilder {
        BoxTreeBuilder::default()
    }

    /// A document that has not been laid out yet.
    pub fn unlaid() -> Self {
        BoxTreeBuilder::default().build()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Text of a box as a string.
    pub fn node_text(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.text.as_deref()
    }

    fn node(&self, node: NodeId) -> Option<&BoxNode> {
        self.nodes.get(node.0)
    }
}

impl StructuredSource for BoxTree {
    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.next_sibling
    }

    fn text(&self, node: NodeId) -> Option<&[u8]> {
        self.node(node)?.text.as_deref().map(str::as_bytes)
    }

    fn byte_offset(&self, node: NodeId) -> usize {
        self.node(node).map_or(0, |n| n.byte_offset)
    }

    fn is_replaced(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.object)
    }

    fn coords(&self, node: NodeId) -> (i32, i32) {
        let mut x = 0;
        let mut y = 0;
        let mut cursor = self.node(node);
        while let Some(n) = cursor {
            x += n.geometry.x;
            y += n.geometry.y;
            cursor = n.parent.and_then(|p| self.node(p));
        }
        (x, y)
    }

    fn size(&self, node: NodeId) -> (i32, i32) {
        self.node(node)
            .map_or((0, 0), |n| (n.geometry.width, n.geometry.height))
    }
}

impl Document for BoxTree {
    fn content_id(&self) -> ContentId {
        self.id
    }

    fn text_source(&self) -> TextSource<'_> {
        TextSource::Structured(self)
    }
}

/// Builds a [`BoxTree`] in document order.
///
/// `open` starts a container box that following boxes nest inside until
/// the matching `close`. Boxes added once every container is closed become
/// children of the root. Text boxes receive consecutive byte offsets;
/// object boxes take up no text.
#[derive(Debug, Default)]
pub struct BoxTreeBuilder {
    nodes: Vec<BoxNode>,
    root: Option<NodeId>,
    open: Vec<NodeId>,
    offset: usize,
}

impl BoxTreeBuilder {
    pub fn open(mut self, geometry: Geometry) -> Self {
        let id = self.attach(BoxNode {
            byte_offset: self.offset,
            geometry,
            ..BoxNode::default()
        });
        self.open.push(id);
        self
    }

    pub fn text(mut self, text: &str, geometry: Geometry) -> Self {
        self.attach(BoxNode {
            text: Some(text.to_string()),
            byte_offset: self.offset,
            geometry,
            ..BoxNode::default()
        });
        self.offset += text.len();
        self
    }

    /// Adds a box replaced by an embedded object. `alt` is kept on the box
    /// but is never searched.
    pub fn object(mut self, alt: Option<&str>, geometry: Geometry) -> Self {
        self.attach(BoxNode {
            text: alt.map(str::to_string),
            byte_offset: self.offset,
            object: true,
            geometry,
            ..BoxNode::default()
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.open.pop();
        self
    }

    pub fn build(self) -> BoxTree {
        BoxTree {
            id: ContentId::fresh(),
            nodes: self.nodes,
            root: self.root,
        }
    }

    fn attach(&mut self, mut node: BoxNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied().or(self.root);

        match parent {
            Some(parent) => {
                node.parent = Some(parent);
                match self.nodes[parent.0].last_child {
                    Some(last) => self.nodes[last.0].next_sibling = Some(id),
                    None => self.nodes[parent.0].first_child = Some(id),
                }
                self.nodes[parent.0].last_child = Some(id);
            }
            None => self.root = Some(id),
        }

        self.nodes.push(node);
        id
    }
}
