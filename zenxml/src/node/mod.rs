//! Node structures for XML tree representation.
//!
//! A parsed document is an [`XmlTree`]: an arena of nodes addressed by
//! [`NodeId`]. The first node is always the document node; the root element
//! is its only element child. Trees are read-only once built, so they can be
//! shared across threads behind an `Arc` without locking.

mod builder;
mod namespace;
mod xml_content;

pub use builder::ElementBuilder;
pub use namespace::{local_name, split_qname};
pub use xml_content::{XmlAttribute, XmlComment, XmlContent, XmlElement, XmlText};

/// Index of a node inside its [`XmlTree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// The data of a node in the tree.
///
/// Each node has:
/// - XML content (document, element, text or comment)
/// - 0 or more children
/// - A parent (except for the document node)
#[derive(Debug, Clone)]
pub struct NodeData {
    content: XmlContent,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    /// Returns the content of this node.
    pub fn content(&self) -> &XmlContent {
        &self.content
    }

    /// Returns the parent id, `None` for the document node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child ids in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A read-only XML document tree.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<NodeData>,
}

impl Default for XmlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlTree {
    /// Id of the document node.
    pub const DOCUMENT: NodeId = NodeId(0);

    /// Creates a tree holding only the document node.
    pub fn new() -> Self {
        XmlTree {
            nodes: vec![NodeData {
                content: XmlContent::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Creates a tree whose root element is built from `root`.
    pub fn from_root(root: ElementBuilder) -> Self {
        let mut tree = XmlTree::new();
        root.build_into(&mut tree, Self::DOCUMENT);
        tree
    }

    /// Appends a node under `parent` and returns its id.
    pub(crate) fn append(&mut self, parent: NodeId, content: XmlContent) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            content,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the number of nodes, including the document node.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds nothing but the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    /// Returns the node with the given id, if it exists.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Returns the content of a node.
    pub fn content(&self, id: NodeId) -> &XmlContent {
        &self.node(id).content
    }

    /// Returns the element data of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&XmlElement> {
        self.content(id).as_element()
    }

    /// Returns the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the element children of a node in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&child| self.content(child).is_element())
    }

    /// Returns the root element, the first element child of the document node.
    pub fn root_element(&self) -> Option<NodeId> {
        self.element_children(Self::DOCUMENT).next()
    }

    /// Returns the local name of an element node.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(XmlElement::local_name)
    }

    /// Returns true if the node has at least one element child.
    pub fn has_elements(&self, id: NodeId) -> bool {
        self.element_children(id).next().is_some()
    }

    /// Returns true if the node is an element with attributes.
    pub fn has_attributes(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(XmlElement::has_attributes)
    }

    /// Returns true if the node has direct text children.
    pub fn has_text(&self, id: NodeId) -> bool {
        self.children(id)
            .iter()
            .any(|&child| self.content(child).is_text())
    }

    /// Returns the concatenated text of all descendant text nodes in
    /// document order.
    pub fn text_value(&self, id: NodeId) -> String {
        if let XmlContent::Text(text) = self.content(id) {
            return text.text().to_string();
        }

        let mut value = String::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            match self.content(current) {
                XmlContent::Text(text) => value.push_str(text.text()),
                XmlContent::Element(_) => {
                    stack.extend(self.children(current).iter().rev().copied());
                }
                XmlContent::Comment(_) | XmlContent::Document => {}
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlTree {
        XmlTree::from_root(
            ElementBuilder::new("root")
                .attr("id", "r")
                .child(ElementBuilder::new("a").text("one"))
                .comment("note")
                .child(
                    ElementBuilder::new("b")
                        .text("two ")
                        .child(ElementBuilder::new("c").text("three")),
                ),
        )
    }

    #[test]
    fn test_empty_tree() {
        let tree = XmlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.root_element().is_none());
        assert!(tree.content(XmlTree::DOCUMENT).is_document());
    }

    #[test]
    fn test_root_element() {
        let tree = sample();
        let root = tree.root_element().unwrap();
        assert_eq!(tree.local_name(root), Some("root"));
        assert_eq!(tree.parent(root), Some(XmlTree::DOCUMENT));
        assert!(tree.has_attributes(root));
        assert!(tree.has_elements(root));
    }

    #[test]
    fn test_element_children_skip_comments() {
        let tree = sample();
        let root = tree.root_element().unwrap();
        assert_eq!(tree.children(root).len(), 3);
        let names: Vec<_> = tree
            .element_children(root)
            .filter_map(|id| tree.local_name(id))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_text_value_concatenates_descendants() {
        let tree = sample();
        let root = tree.root_element().unwrap();
        assert_eq!(tree.text_value(root), "onetwo three");
        let b = tree.element_children(root).nth(1).unwrap();
        assert!(tree.has_text(b));
        assert_eq!(tree.text_value(b), "two three");
    }

    #[test]
    fn test_get_out_of_range() {
        let tree = XmlTree::new();
        assert!(tree.get(NodeId(5)).is_none());
        assert!(tree.get(XmlTree::DOCUMENT).is_some());
    }
}
