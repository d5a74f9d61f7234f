//! Index-based XML tree.
//!
//! Nodes live in one arena and refer to each other by [`NodeId`], so
//! splitting a run and inserting siblings is plain vector bookkeeping.
//! Detached nodes stay in the arena but are no longer reachable from the
//! roots and are not serialized.
//!
//! Parsing uses `quick-xml` and keeps every event: declarations, comments
//! and processing instructions are stored verbatim, text is stored
//! unescaped, and whitespace-only text is preserved.

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{MorphmarkError, Result};

/// Handle of a node in an [`XmlTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    /// Markup written back unchanged (declaration, comment, CDATA, ...).
    Raw(String),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug, Default)]
pub struct XmlTree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl XmlTree {
    /// Parse a complete XML document.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut tree = XmlTree::default();
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            let event = reader.read_event()?;
            let id = match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let id = tree.alloc(Self::element_kind(e)?);
                    tree.attach(stack.last().copied(), id);
                    if matches!(event, Event::Start(_)) {
                        stack.push(id);
                    }
                    continue;
                }
                Event::End(_) => {
                    stack.pop();
                    continue;
                }
                Event::Text(e) => tree.alloc(NodeKind::Text(e.unescape()?.into_owned())),
                Event::CData(e) => tree.alloc(NodeKind::Raw(format!(
                    "<![CDATA[{}]]>",
                    String::from_utf8_lossy(&e)
                ))),
                Event::Comment(e) => tree.alloc(NodeKind::Raw(format!(
                    "<!--{}-->",
                    String::from_utf8_lossy(&e)
                ))),
                Event::Decl(e) => tree.alloc(NodeKind::Raw(format!(
                    "<?{}?>",
                    String::from_utf8_lossy(&e)
                ))),
                Event::PI(e) => tree.alloc(NodeKind::Raw(format!(
                    "<?{}?>",
                    String::from_utf8_lossy(&e)
                ))),
                Event::DocType(e) => tree.alloc(NodeKind::Raw(format!(
                    "<!DOCTYPE {}>",
                    String::from_utf8_lossy(&e)
                ))),
                Event::Eof => break,
            };
            tree.attach(stack.last().copied(), id);
        }

        if !stack.is_empty() {
            return Err(MorphmarkError::xml("Unexpected end of document"));
        }

        Ok(tree)
    }

    fn element_kind(start: &BytesStart<'_>) -> Result<NodeKind> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            attrs.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                attr.unescape_value()?.into_owned(),
            ));
        }
        Ok(NodeKind::Element { name, attrs })
    }

    /// Serialize the reachable tree.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for &root in &self.roots {
            self.write_node(&mut writer, root)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|e| MorphmarkError::xml(format!("Serialized XML is not UTF-8: {e}")))
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Element { name, attrs } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attrs {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                if node.children.is_empty() {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for &child in &node.children {
                        self.write_node(writer, child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
                }
            }
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            NodeKind::Raw(raw) => {
                writer.get_mut().write_all(raw.as_bytes())?;
            }
        }
        Ok(())
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn attach(&mut self, parent: Option<NodeId>, child: NodeId) {
        match parent {
            Some(parent) => self.append_child(parent, child),
            None => self.roots.push(child),
        }
    }

    /// Create a detached element.
    pub fn new_element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Element {
            name: name.to_string(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn new_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    /// Create a detached element with the same name and attributes as `id`
    /// but no children.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let kind = self.nodes[id.0].kind.clone();
        self.alloc(kind)
    }

    /// Detached copy of `id` and its whole subtree.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let copy = self.shallow_clone(id);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// The first top-level element.
    pub fn root_element(&self) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| self.is_element(id))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    /// Qualified element name, `None` for non-elements.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_named(&self, id: NodeId, name: &str) -> bool {
        self.name(id) == Some(name)
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// Set or replace an attribute. Ignored for non-elements.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            match attrs.iter_mut().find(|(k, _)| k == key) {
                Some(entry) => entry.1 = value.to_string(),
                None => attrs.push((key.to_string(), value.to_string())),
            }
        }
    }

    /// Text content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of the direct text children of `id`.
    pub fn inner_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&child| self.text(child))
            .collect()
    }

    /// Replace the children of `id` with a single text node.
    pub fn set_inner_text(&mut self, id: NodeId, text: &str) {
        for child in self.children(id).to_vec() {
            self.detach(child);
        }
        if !text.is_empty() {
            let node = self.new_text(text);
            self.append_child(id, node);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Element children with the given name.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.is_named(child, name))
    }

    pub fn first_child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(id, name).next()
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` into `parent` at `index` (clamped to the child count).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `node` immediately after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<()> {
        let parent = self
            .parent(sibling)
            .ok_or_else(|| MorphmarkError::xml("Cannot insert after a detached node"))?;
        let index = self
            .index_in_parent(sibling)
            .ok_or_else(|| MorphmarkError::xml("Node is not a child of its parent"))?;
        self.insert_child(parent, index + 1, node);
        Ok(())
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Remove `id` from its parent (or from the roots).
    pub fn detach(&mut self, id: NodeId) {
        match self.nodes[id.0].parent.take() {
            Some(parent) => self.nodes[parent.0].children.retain(|&c| c != id),
            None => self.roots.retain(|&c| c != id),
        }
    }

    /// Pre-order iterator over `id` and its descendants.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a XmlTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
