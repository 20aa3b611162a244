//! XML parser that builds node trees.
//!
//! This parser uses quick-xml's streaming API to build an [`XmlTree`].
//! Whitespace-only character data is dropped, other text is kept verbatim.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::node::{NodeId, XmlAttribute, XmlComment, XmlContent, XmlElement, XmlText, XmlTree};

/// XML parser that builds node trees.
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    _private: (),
}

/// Character data collected between two markup events.
#[derive(Default)]
struct PendingText {
    text: String,
    /// CDATA sections are kept even when they only hold whitespace.
    significant: bool,
}

impl PendingText {
    fn push(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn push_cdata(&mut self, text: &str) {
        self.text.push_str(text);
        self.significant = true;
    }

    fn take(&mut self) -> Option<String> {
        let keep = self.significant || !self.text.trim().is_empty();
        self.significant = false;
        let text = std::mem::take(&mut self.text);
        keep.then_some(text)
    }
}

impl XmlParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        XmlParser { _private: () }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<XmlTree> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        // Don't trim text - whitespace-only runs are filtered when flushed
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<XmlTree> {
        let file = File::open(path)?;
        let buf_reader = BufReader::new(file);
        let mut reader = Reader::from_reader(buf_reader);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a quick-xml Reader.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<XmlTree> {
        let mut tree = XmlTree::new();
        let mut node_stack: Vec<NodeId> = vec![XmlTree::DOCUMENT];
        let mut pending = PendingText::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let parent = current(&node_stack);
                    flush_text(&mut tree, parent, &mut pending)?;
                    let element = self.parse_element(e, reader)?;
                    let node = append_element(&mut tree, parent, element)?;
                    node_stack.push(node);
                }
                Ok(Event::End(_)) => {
                    flush_text(&mut tree, current(&node_stack), &mut pending)?;
                    if node_stack.len() == 1 {
                        return Err(Error::Parse(format!(
                            "unexpected end tag at byte {}",
                            reader.buffer_position()
                        )));
                    }
                    node_stack.pop();
                }
                Ok(Event::Empty(ref e)) => {
                    // Self-closing tag - handle like Start + End
                    let parent = current(&node_stack);
                    flush_text(&mut tree, parent, &mut pending)?;
                    let element = self.parse_element(e, reader)?;
                    append_element(&mut tree, parent, element)?;
                }
                Ok(Event::Text(e)) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| xml_error(reader, e))?;
                    pending.push(&text);
                }
                Ok(Event::GeneralRef(e)) => {
                    let name =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    pending.push(&resolve_reference(name)?);
                }
                Ok(Event::CData(ref e)) => {
                    let text = String::from_utf8_lossy(e.as_ref());
                    pending.push_cdata(&text);
                }
                Ok(Event::Comment(ref e)) => {
                    let parent = current(&node_stack);
                    flush_text(&mut tree, parent, &mut pending)?;
                    let comment_text = String::from_utf8_lossy(e.as_ref()).to_string();
                    tree.append(parent, XmlContent::Comment(XmlComment::new(comment_text)));
                }
                Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {
                    // Ignore XML declaration, processing instructions and DOCTYPE
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(reader, e)),
            }
            buf.clear();
        }

        flush_text(&mut tree, current(&node_stack), &mut pending)?;

        if let Some(&open) = node_stack.last().filter(|_| node_stack.len() > 1) {
            let name = tree.element(open).map(XmlElement::qname).unwrap_or_default();
            return Err(Error::Parse(format!(
                "unexpected end of document: element <{}> is not closed",
                name
            )));
        }
        if tree.root_element().is_none() {
            return Err(Error::Parse("document has no root element".to_string()));
        }

        Ok(tree)
    }

    /// Parses an element's name and attributes.
    fn parse_element<R: BufRead>(&self, e: &BytesStart, reader: &Reader<R>) -> Result<XmlElement> {
        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| xml_error(reader, e))?
            .to_string();

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| xml_error(reader, e))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| xml_error(reader, e))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| xml_error(reader, e))?
                .to_string();
            attributes.push(XmlAttribute::new(key, value));
        }

        Ok(XmlElement::with_attributes(name, attributes))
    }
}

/// Wraps an error reported by quick-xml with the reader position.
fn xml_error<R>(reader: &Reader<R>, source: impl Into<quick_xml::Error>) -> Error {
    Error::Xml {
        source: source.into(),
        position: reader.buffer_position() as u64,
    }
}

fn current(stack: &[NodeId]) -> NodeId {
    stack.last().copied().unwrap_or(XmlTree::DOCUMENT)
}

fn append_element(tree: &mut XmlTree, parent: NodeId, element: XmlElement) -> Result<NodeId> {
    if parent == XmlTree::DOCUMENT && tree.root_element().is_some() {
        return Err(Error::Parse(format!(
            "multiple root elements: <{}> follows the root element",
            element.qname()
        )));
    }
    Ok(tree.append(parent, XmlContent::Element(element)))
}

fn flush_text(tree: &mut XmlTree, parent: NodeId, pending: &mut PendingText) -> Result<()> {
    let Some(text) = pending.take() else {
        return Ok(());
    };
    if parent == XmlTree::DOCUMENT {
        return Err(Error::Parse(format!(
            "text outside the root element: {:?}",
            text.trim()
        )));
    }
    tree.append(parent, XmlContent::Text(XmlText::new(text)));
    Ok(())
}

/// Resolves a general entity or character reference (the part between `&` and `;`).
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => code.parse::<u32>(),
        };
        return value
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| Error::Parse(format!("invalid character reference &{};", name)));
    }
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| Error::Parse(format!("unknown entity reference &{};", name)))
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<XmlTree> {
    XmlParser::new().parse_file(path)
}

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> Result<XmlTree> {
    XmlParser::new().parse_str(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn root_of(tree: &XmlTree) -> NodeId {
        tree.root_element().expect("root element")
    }

    #[test]
    fn test_parse_simple_xml() {
        let tree = parse_str(r#"<root><child>text</child></root>"#).unwrap();

        let root = root_of(&tree);
        assert_eq!(tree.local_name(root), Some("root"));
        assert_eq!(tree.children(XmlTree::DOCUMENT), &[root]);

        let child = tree.element_children(root).next().unwrap();
        assert_eq!(tree.local_name(child), Some("child"));
        assert_eq!(tree.text_value(child), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let tree = parse_str(r#"<root id="foo" class="bar">content</root>"#).unwrap();
        let element = tree.element(root_of(&tree)).unwrap();
        assert_eq!(element.attribute("id"), Some("foo"));
        assert_eq!(element.attribute("class"), Some("bar"));
        assert_eq!(element.attributes()[0].qname(), "id");
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let xml = "<?xml version=\"1.0\"?>\n\n<root>\n  <a>x</a>\n  <b>  padded  </b>\n</root>\n";
        let tree = parse_str(xml).unwrap();
        let root = root_of(&tree);
        assert_eq!(tree.children(root).len(), 2);
        let b = tree.element_children(root).nth(1).unwrap();
        assert_eq!(tree.text_value(b), "  padded  ");
    }

    #[test]
    fn test_entities_and_char_refs() {
        let tree = parse_str(r#"<root a="&lt;&amp;&gt;">x &amp; y &#65;&#x42;</root>"#).unwrap();
        let root = root_of(&tree);
        assert_eq!(tree.element(root).unwrap().attribute("a"), Some("<&>"));
        assert_eq!(tree.text_value(root), "x & y AB");
        assert_eq!(tree.children(root).len(), 1);
    }

    #[test]
    fn test_cdata_is_text() {
        let tree = parse_str("<root><![CDATA[<raw> & ]]></root>").unwrap();
        assert_eq!(tree.text_value(root_of(&tree)), "<raw> & ");
    }

    #[test]
    fn test_comments_are_kept() {
        let tree = parse_str("<!-- head --><root><!--inner--><a/></root>").unwrap();
        assert!(tree.content(tree.children(XmlTree::DOCUMENT)[0]).is_comment());
        let root = root_of(&tree);
        assert_eq!(tree.children(root).len(), 2);
        assert_eq!(tree.element_children(root).count(), 1);
    }

    #[test]
    fn test_empty_element() {
        let tree = parse_str(r#"<root><empty /></root>"#).unwrap();
        let root = root_of(&tree);
        let empty = tree.element_children(root).next().unwrap();
        assert_eq!(tree.local_name(empty), Some("empty"));
        assert!(tree.children(empty).is_empty());
    }

    #[test]
    fn test_prefixed_names() {
        let tree = parse_str(r#"<p:root xmlns:p="urn:p" p:id="1"><p:item/></p:root>"#).unwrap();
        let root = root_of(&tree);
        assert_eq!(tree.element(root).unwrap().qname(), "p:root");
        assert_eq!(tree.local_name(root), Some("root"));
    }

    #[test]
    fn test_unclosed_element_fails() {
        let err = parse_str("<root><a>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_mismatched_end_tag_keeps_reader_error() {
        let err = parse_str("<root></other>").unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let source = std::error::Error::source(&err).expect("source error");
        assert!(source.downcast_ref::<quick_xml::Error>().is_some());
    }

    #[test]
    fn test_bad_attribute_keeps_reader_error() {
        let err = parse_str(r#"<root a="1" a="2"/>"#).unwrap_err();
        assert!(matches!(err, Error::Xml { .. }));
        assert!(err.to_string().starts_with("XML error at byte"));
    }

    #[test]
    fn test_multiple_roots_fail() {
        let err = parse_str("<a/><b/>").unwrap_err();
        assert!(err.to_string().contains("multiple root elements"));
    }

    #[test]
    fn test_no_root_fails() {
        assert!(matches!(parse_str("<!-- only -->"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_text_outside_root_fails() {
        assert!(matches!(parse_str("junk<root/>"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let tree = parse_str("\u{feff}<root/>").unwrap();
        assert_eq!(tree.local_name(root_of(&tree)), Some("root"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse_file("/definitely/not/here.xml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
