//! Lenient markup loading into an immutable, classified node arena.
//!
//! Both dialects go through the html5ever family of tree builders, which
//! recover from malformed input instead of failing. The resulting DOM is
//! flattened in document order so every subtree is a contiguous id range,
//! and each node is classified once into a [`NodeKind`].

use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as DomData, RcDom};
use thiserror::Error;

use crate::document::{Document, DocumentKind};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("No root element: {0}")]
    NoRootElement(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Structural role of a node, as far as text extraction cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Paragraph,
    Table,
    Row,
    Cell,
    Footnote,
    Text,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment,
    ProcessingInstruction,
}

#[derive(Debug, Clone)]
pub struct Node {
    data: NodeData,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subtree_end: usize,
}

impl Node {
    pub const fn data(&self) -> &NodeData {
        &self.data
    }

    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub const fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }
}

/// How text strings below a node are stitched together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub separator: &'static str,
    pub strip: bool,
}

impl TextStyle {
    /// Strings concatenated as-is.
    pub const CONCAT: Self = Self {
        separator: "",
        strip: false,
    };
    /// Strings joined with a space, whitespace kept.
    pub const SPACED: Self = Self {
        separator: " ",
        strip: false,
    };
    /// Strings trimmed, empty ones dropped, joined with a space.
    pub const STRIPPED: Self = Self {
        separator: " ",
        strip: true,
    };
}

/// Decision returned by a [`Tree::visit`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    SkipSubtree,
}

/// Parsed document, exclusively owned by one extraction call.
#[derive(Debug, Clone)]
pub struct Tree {
    kind: DocumentKind,
    declared: DocumentKind,
    nodes: Vec<Node>,
}

/// Loads a document, redirecting XML files that are really HTML.
pub fn load(document: &Document) -> ParseResult<Tree> {
    let tree = Tree::parse(document.content(), document.kind());

    if document.kind() == DocumentKind::Xml && tree.has_html_doctype() {
        tracing::debug!(id = document.id(), "html doctype in xml file, loading as html");
        let mut html = Tree::parse(document.content(), DocumentKind::Html);
        html.declared = DocumentKind::Xml;
        return Ok(html);
    }

    if tree.document_element().is_none() {
        return Err(ParseError::NoRootElement(document.id().to_string()));
    }

    Ok(tree)
}

impl Tree {
    /// Builds a tree without any dialect redirect. Never fails: malformed
    /// markup is repaired by the underlying tree builder.
    pub fn parse(text: &str, kind: DocumentKind) -> Self {
        let dom = match kind {
            DocumentKind::Html => {
                html5ever::parse_document(RcDom::default(), html5ever::ParseOpts::default())
                    .one(text)
            }
            DocumentKind::Xml => xml5ever::driver::parse_document(
                RcDom::default(),
                xml5ever::driver::XmlParseOpts::default(),
            )
            .one(text),
        };
        Self::from_dom(&dom, kind)
    }

    fn from_dom(dom: &RcDom, kind: DocumentKind) -> Self {
        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<(Handle, Option<NodeId>)> = vec![(dom.document.clone(), None)];

        while let Some((handle, parent)) = stack.pop() {
            let id = NodeId(nodes.len());
            let data = convert(&handle);
            nodes.push(Node {
                kind: classify(kind, &data),
                data,
                parent,
                children: Vec::new(),
                subtree_end: 0,
            });
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }
            for child in handle.children.borrow().iter().rev() {
                stack.push((child.clone(), Some(id)));
            }
        }

        for i in (0..nodes.len()).rev() {
            let end = nodes[i]
                .children
                .last()
                .map_or(i + 1, |last| nodes[last.0].subtree_end);
            nodes[i].subtree_end = end;
        }

        Self {
            kind,
            declared: kind,
            nodes,
        }
    }

    /// Dialect the tree was built with.
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Dialect the file claimed to be.
    pub const fn declared_kind(&self) -> DocumentKind {
        self.declared
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .find(|&id| self.node(id).is_element())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// All nodes strictly below `id`, in document order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> {
        (id.0 + 1..self.nodes[id.0].subtree_end).map(NodeId)
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, |&p| self.node(p).parent)
    }

    pub fn has_ancestor_of_kind(&self, id: NodeId, kind: NodeKind) -> bool {
        self.ancestors(id).any(|a| self.node(a).kind == kind)
    }

    pub fn first_descendant_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.descendants(id).find(|&d| self.node(d).kind == kind)
    }

    /// True when the declaration area before the root element carries an
    /// HTML doctype.
    pub fn has_html_doctype(&self) -> bool {
        self.children(self.root())
            .take_while(|&id| !self.node(id).is_element())
            .any(|id| match &self.node(id).data {
                NodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                } => [name, public_id, system_id]
                    .iter()
                    .any(|s| s.to_ascii_lowercase().contains("html")),
                _ => false,
            })
    }

    /// Pre-order walk below `id`; the callback may prune subtrees.
    pub fn visit<'a, F>(&'a self, id: NodeId, mut f: F)
    where
        F: FnMut(NodeId, &'a Node) -> Visit,
    {
        let end = self.nodes[id.0].subtree_end;
        let mut i = id.0 + 1;
        while i < end {
            let node = &self.nodes[i];
            i = match f(NodeId(i), node) {
                Visit::Descend => i + 1,
                Visit::SkipSubtree => node.subtree_end,
            };
        }
    }

    /// Text below `id`. Footnotes contribute nothing, including when `id`
    /// is itself a footnote.
    pub fn text(&self, id: NodeId, style: TextStyle) -> String {
        if self.node(id).kind == NodeKind::Footnote {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        self.visit(id, |_, node| match (&node.data, node.kind) {
            (_, NodeKind::Footnote) => Visit::SkipSubtree,
            (NodeData::Text(text), _) => {
                let text = if style.strip { text.trim() } else { text.as_str() };
                if !(style.strip && text.is_empty()) {
                    parts.push(text);
                }
                Visit::Descend
            }
            _ => Visit::Descend,
        });
        parts.join(style.separator)
    }
}

fn convert(handle: &Handle) -> NodeData {
    match &handle.data {
        DomData::Document => NodeData::Document,
        DomData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        },
        DomData::Text { contents } => NodeData::Text(contents.borrow().to_string()),
        DomData::Comment { .. } => NodeData::Comment,
        DomData::Element { name, attrs, .. } => NodeData::Element {
            name: name.local.to_string(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect(),
        },
        DomData::ProcessingInstruction { .. } => NodeData::ProcessingInstruction,
    }
}

/// HTML names are lowercased by the parser; Formex XML uses upper case
/// and marks footnotes with `TYPE="FOOTNOTE"`.
fn classify(kind: DocumentKind, data: &NodeData) -> NodeKind {
    let (name, attrs) = match data {
        NodeData::Element { name, attrs } => (name.as_str(), attrs),
        NodeData::Text(_) => return NodeKind::Text,
        _ => return NodeKind::Other,
    };

    match kind {
        DocumentKind::Html => match name {
            "p" => NodeKind::Paragraph,
            "table" => NodeKind::Table,
            "tr" => NodeKind::Row,
            "td" => NodeKind::Cell,
            _ => NodeKind::Other,
        },
        DocumentKind::Xml => {
            if attrs.iter().any(|(k, v)| k == "TYPE" && v == "FOOTNOTE") {
                return NodeKind::Footnote;
            }
            match name {
                "P" => NodeKind::Paragraph,
                "TBL" => NodeKind::Table,
                "ROW" => NodeKind::Row,
                "CELL" => NodeKind::Cell,
                _ => NodeKind::Other,
            }
        }
    }
}
