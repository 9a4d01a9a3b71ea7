//! Element tree types and HTML serialization.

use indexmap::IndexMap;

use crate::build::{validate_tag, DomError};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in an element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested element
    Element(Element),
    /// Text content, escaped on output
    Text(String),
    /// Trusted markup, written verbatim on output
    Raw(String),
}

impl Node {
    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a raw markup node.
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::Raw(markup.into())
    }

    /// Borrow the element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Self::Text(text) | Self::Raw(text) => out.push_str(text),
        }
    }

    /// Serialize this node to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(el) => el.write_html(out),
            Self::Text(text) => out.push_str(&escape_text(text)),
            Self::Raw(markup) => out.push_str(markup),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A single element with ordered attributes and children.
///
/// An element owns its children, so a node can only ever sit under one
/// parent. Attaching moves the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element after validating the tag name.
    pub fn new(tag: &str) -> Result<Self, DomError> {
        validate_tag(tag)?;
        Ok(Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        })
    }

    /// Tag name (lowercase).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check whether an attribute is present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The element id, if set.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Class tokens in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check for a class token.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Set an attribute without validating its name.
    ///
    /// Overwriting keeps the attribute's original position.
    pub(crate) fn set_attr_unchecked(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable child nodes.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Append a node as the last child.
    pub fn append(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Move every node of a fragment into this element, in order.
    pub fn append_fragment(&mut self, fragment: Fragment) {
        self.children.extend(fragment.nodes);
    }

    /// Remove all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Replace the content with trusted markup.
    pub fn set_inner(&mut self, markup: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Raw(markup.into()));
    }

    /// Replace the content with escaped text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(Node::Text(text.into()));
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Depth-first search for the first element matching a predicate,
    /// including this one.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(pred))
    }

    /// Every element matching a predicate, in document order.
    pub fn find_all(&self, pred: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_matching(pred, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, pred: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(pred, out);
        }
    }

    /// Find a descendant (or self) by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|el| el.id() == Some(id))
    }

    /// Child-index path from this element to the element with the given id.
    ///
    /// An empty path means this element itself.
    pub fn path_to_id(&self, id: &str) -> Option<Vec<usize>> {
        if self.id() == Some(id) {
            return Some(Vec::new());
        }
        for (index, child) in self.children.iter().enumerate() {
            if let Node::Element(el) = child {
                if let Some(mut path) = el.path_to_id(id) {
                    path.insert(0, index);
                    return Some(path);
                }
            }
        }
        None
    }

    /// Resolve a child-index path.
    pub fn at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?.as_element()?;
        }
        Some(current)
    }

    /// Resolve a child-index path mutably.
    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Serialize this element and its descendants to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// An ordered group of unattached sibling nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the fragment holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable top-level nodes.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Add a node at the end.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.nodes.push(node.into());
    }

    /// Take the nodes out of the fragment.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Serialize all nodes to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

impl From<Vec<Node>> for Fragment {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Fragment {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Escape text content.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value, including single quotes.
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
