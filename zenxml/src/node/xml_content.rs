//! XML content types for tree nodes.
//!
//! This module provides `XmlContent`, which represents the content of a node
//! in an [`XmlTree`](super::XmlTree): the document itself, an element (tag
//! with attributes), text, or a comment.

use super::namespace::local_name;

/// Represents the content of an XML node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    /// The document node. Only the first node of a tree carries it.
    Document,
    /// An XML element with a qualified name and attributes.
    Element(XmlElement),
    /// XML text content (character data and CDATA).
    Text(XmlText),
    /// XML comment.
    Comment(XmlComment),
}

impl XmlContent {
    /// Returns true if this is the document node.
    pub fn is_document(&self) -> bool {
        matches!(self, XmlContent::Document)
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, XmlContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, XmlContent::Text(_))
    }

    /// Returns true if this is a comment node.
    pub fn is_comment(&self) -> bool {
        matches!(self, XmlContent::Comment(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&XmlText> {
        match self {
            XmlContent::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A single attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    name: String,
    value: String,
}

impl XmlAttribute {
    /// Creates a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        XmlAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the qualified name (e.g. `xml:lang`).
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the name without its prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Returns the attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An XML element with a qualified name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// The qualified name of the element (e.g., "div", "ns:element").
    name: String,
    /// Attributes in document order, unique by qualified name.
    attributes: Vec<XmlAttribute>,
}

impl XmlElement {
    /// Creates a new XML element with the given name and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Creates a new XML element with the given name and attributes.
    ///
    /// A later attribute with the same qualified name replaces an earlier one.
    pub fn with_attributes<I>(name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = XmlAttribute>,
    {
        let mut element = XmlElement::new(name);
        for attr in attributes {
            element.set_attribute(attr);
        }
        element
    }

    pub(crate) fn set_attribute(&mut self, attr: XmlAttribute) {
        match self.attributes.iter_mut().find(|a| a.name == attr.name) {
            Some(existing) => existing.value = attr.value,
            None => self.attributes.push(attr),
        }
    }

    /// Returns the qualified name of the element.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the element name without its prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Returns true if the element carries at least one attribute.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Looks up an attribute value by qualified name.
    pub fn attribute(&self, qname: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == qname)
            .map(|a| a.value.as_str())
    }
}

impl std::fmt::Display for XmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {{", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}={}", attr.name, attr.value)?;
        }
        write!(f, " }}")
    }
}

/// XML text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlText {
    text: String,
}

impl XmlText {
    /// Creates a new text node from a string.
    pub fn new(text: impl Into<String>) -> Self {
        XmlText { text: text.into() }
    }

    /// Returns the text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for XmlText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// XML comment content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlComment {
    /// The comment text (without the <!-- and --> markers).
    text: String,
}

impl XmlComment {
    /// Creates a new comment node from a string.
    pub fn new(text: impl Into<String>) -> Self {
        XmlComment { text: text.into() }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for XmlComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<!--{}-->", self.text)
    }
}
