//! Builder for constructing trees in code.
//!
//! ```
//! use zenxml::{ElementBuilder, XmlTree};
//!
//! // <order id="7"><line>Widget</line><line>Gadget</line></order>
//! let tree = XmlTree::from_root(
//!     ElementBuilder::new("order")
//!         .attr("id", "7")
//!         .child(ElementBuilder::new("line").text("Widget"))
//!         .child(ElementBuilder::new("line").text("Gadget")),
//! );
//! let root = tree.root_element().unwrap();
//! assert_eq!(tree.element_children(root).count(), 2);
//! ```

use super::{NodeId, XmlAttribute, XmlComment, XmlContent, XmlElement, XmlText, XmlTree};

#[derive(Debug, Clone)]
enum Pending {
    Element(ElementBuilder),
    Text(String),
    Comment(String),
}

/// Describes an element and its subtree before it is placed in a tree.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    element: XmlElement,
    children: Vec<Pending>,
}

impl ElementBuilder {
    /// Starts an element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        ElementBuilder {
            element: XmlElement::new(name),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, replacing any earlier one with the same name.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.element.set_attribute(XmlAttribute::new(name, value));
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(Pending::Element(child));
        self
    }

    /// Appends a text node. Adjacent text is merged into one node.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match self.children.last_mut() {
            Some(Pending::Text(existing)) => existing.push_str(&text),
            _ => self.children.push(Pending::Text(text)),
        }
        self
    }

    /// Appends a comment.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.children.push(Pending::Comment(text.into()));
        self
    }

    /// Places this element (and its subtree) under `parent`.
    pub(crate) fn build_into(self, tree: &mut XmlTree, parent: NodeId) -> NodeId {
        let root = tree.append(parent, XmlContent::Element(self.element));
        let mut stack = vec![(root, self.children.into_iter())];
        while let Some((id, pending)) = stack.last_mut() {
            let id = *id;
            let Some(child) = pending.next() else {
                stack.pop();
                continue;
            };
            match child {
                Pending::Element(builder) => {
                    let child_id = tree.append(id, XmlContent::Element(builder.element));
                    stack.push((child_id, builder.children.into_iter()));
                }
                Pending::Text(text) => {
                    tree.append(id, XmlContent::Text(XmlText::new(text)));
                }
                Pending::Comment(text) => {
                    tree.append(id, XmlContent::Comment(XmlComment::new(text)));
                }
            }
        }
        root
    }
}
