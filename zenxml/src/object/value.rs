//! Results of member resolution.

use std::fmt;
use std::sync::Arc;

use crate::coerce::{FromXmlText, Scalar};
use crate::config::Comparison;
use crate::error::{Error, Result};
use crate::node::{NodeId, XmlTree};

use super::classify::matching_children;
use super::XmlObject;

/// The value a member access resolved to.
#[derive(Debug, Clone)]
pub enum Value {
    /// An attribute value, the text of a leaf element, or `InnerText`.
    Text(String),
    /// A single element that has attributes or child elements.
    Object(XmlObject),
    /// Several elements: repeated children, or `AsEnumerable()`.
    Sequence(Children),
    /// The result of an `As` call.
    Scalar(Scalar),
    /// The name matched nothing (lenient policy only).
    Absent,
}

impl Value {
    /// Resolves `name` on the wrapped object.
    ///
    /// `Absent` stays `Absent`, so chains under the lenient policy end in
    /// `Absent` rather than an error. Text, scalars and sequences have no
    /// members.
    pub fn get(&self, name: &str) -> Result<Value> {
        match self {
            Value::Object(object) => object.get(name),
            Value::Absent => Ok(Value::Absent),
            other => Err(Error::InvalidOperation(format!(
                "cannot resolve `{}` on a {} value",
                name,
                other.type_name()
            ))),
        }
    }

    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the object, if this is an object value.
    pub fn as_object(&self) -> Option<&XmlObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns the sequence, if this is a sequence value.
    pub fn as_sequence(&self) -> Option<&Children> {
        match self {
            Value::Sequence(children) => Some(children),
            _ => None,
        }
    }

    /// Returns the scalar, if this is the result of an `As` call.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns true for [`Value::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Converts into the text, if this is a text value.
    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Converts into the object, if this is an object value.
    pub fn into_object(self) -> Option<XmlObject> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Converts the value to `T`.
    ///
    /// Works on text (attribute values and collapsed leaves), objects and
    /// scalars; sequences and `Absent` cannot be converted.
    pub fn as_type<T: FromXmlText>(&self) -> Result<T> {
        match self {
            Value::Text(text) => T::from_xml_text(text),
            Value::Object(object) => object.as_type(),
            Value::Scalar(scalar) => T::from_xml_text(&scalar.to_string()),
            other => Err(Error::InvalidOperation(format!(
                "cannot convert a {} value to {}",
                other.type_name(),
                T::TYPE_NAME
            ))),
        }
    }

    /// Short name of the variant, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Object(_) => "object",
            Value::Sequence(_) => "sequence",
            Value::Scalar(_) => "scalar",
            Value::Absent => "absent",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Object(object) => fmt::Display::fmt(object, f),
            Value::Sequence(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    fmt::Display::fmt(&child, f)?;
                }
                Ok(())
            }
            Value::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Value::Absent => Ok(()),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<XmlObject> for Value {
    fn from(object: XmlObject) -> Self {
        Value::Object(object)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Value::Scalar(scalar)
    }
}

/// A lazy sequence of child element wrappers.
///
/// Nothing is materialized up front: every call to [`iter`](Children::iter)
/// walks the parent's children again and creates wrappers on demand, so a
/// sequence can be enumerated any number of times.
#[derive(Clone)]
pub struct Children {
    parent: XmlObject,
    tree: Arc<XmlTree>,
    filter: Option<NameFilter>,
}

#[derive(Debug, Clone)]
struct NameFilter {
    name: String,
    comparison: Comparison,
}

impl Children {
    /// All child elements of `parent`.
    pub(crate) fn all(parent: XmlObject, tree: Arc<XmlTree>) -> Self {
        Children {
            parent,
            tree,
            filter: None,
        }
    }

    /// Child elements of `parent` whose local name matches `name`.
    pub(crate) fn named(
        parent: XmlObject,
        tree: Arc<XmlTree>,
        name: &str,
        comparison: Comparison,
    ) -> Self {
        Children {
            parent,
            tree,
            filter: Some(NameFilter {
                name: name.to_string(),
                comparison,
            }),
        }
    }

    /// Returns a fresh iterator over the sequence.
    pub fn iter(&self) -> ChildIter<'_> {
        let ids: Box<dyn Iterator<Item = NodeId> + '_> = match &self.filter {
            Some(filter) => Box::new(matching_children(
                &self.tree,
                self.parent.node_id(),
                &filter.name,
                filter.comparison,
            )),
            None => Box::new(self.tree.element_children(self.parent.node_id())),
        };
        ChildIter {
            parent: &self.parent,
            ids,
        }
    }

    /// Returns the number of elements in the sequence.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if the sequence has no elements.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<XmlObject> {
        self.iter().nth(index)
    }

    /// Returns the wrapper the sequence was produced from.
    pub fn parent(&self) -> &XmlObject {
        &self.parent
    }
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("parent", &self.parent.node_id())
            .field("filter", &self.filter)
            .finish()
    }
}

impl<'a> IntoIterator for &'a Children {
    type Item = XmlObject;
    type IntoIter = ChildIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Children`] sequence.
pub struct ChildIter<'a> {
    parent: &'a XmlObject,
    ids: Box<dyn Iterator<Item = NodeId> + 'a>,
}

impl Iterator for ChildIter<'_> {
    type Item = XmlObject;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| self.parent.derive(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn doc() -> XmlObject {
        XmlObject::from_xml("<r><a>1</a><b x=\"y\"><c/></b><a>2</a></r>").unwrap()
    }

    #[test]
    fn test_value_get_chains_through_objects() {
        let value = doc().get("Root").unwrap().get("b").unwrap().get("x").unwrap();
        assert_eq!(value.as_text(), Some("y"));
    }

    #[test]
    fn test_value_get_on_absent_stays_absent() {
        let value = doc().get("Root").unwrap().get("missing").unwrap();
        assert!(value.is_absent());
        assert!(value.get("deeper").unwrap().is_absent());
    }

    #[test]
    fn test_value_get_on_text_fails() {
        let err = Value::Text("x".into()).get("y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(err.to_string().contains("text value"));
    }

    #[test]
    fn test_value_as_type() {
        assert_eq!(Value::from("42").as_type::<u32>().unwrap(), 42);
        assert_eq!(
            Value::Scalar(Scalar::Float(4.5)).as_type::<f64>().unwrap(),
            4.5
        );
        let err = Value::Absent.as_type::<i32>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_sequence_is_lazy_and_reiterable() {
        let root = doc().root().unwrap();
        let value = root.get("a").unwrap();
        let seq = value.as_sequence().unwrap();
        let first: Vec<String> = seq.iter().map(|o| o.inner_text().unwrap()).collect();
        let second: Vec<String> = seq.iter().map(|o| o.inner_text().unwrap()).collect();
        assert_eq!(first, vec!["1", "2"]);
        assert_eq!(first, second);
        assert_eq!(seq.len(), 2);
        assert!(!seq.is_empty());
        assert!(seq.get(2).is_none());
    }

    #[test]
    fn test_sequence_display_prints_each_item() {
        let root = doc().root().unwrap();
        assert_eq!(root.get("a").unwrap().to_string(), "<a>1</a>\n<a>2</a>");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Absent.type_name(), "absent");
        assert_eq!(Value::from("t").type_name(), "text");
        assert_eq!(Value::Absent.to_string(), "");
    }
}
