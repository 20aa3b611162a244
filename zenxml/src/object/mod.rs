//! Member-style navigation over a parsed document.
//!
//! An [`XmlObject`] is bound to one node of an [`XmlTree`]. Resolving a
//! member name against it yields a [`Value`]: attribute values and leaf
//! elements collapse to text, other single elements become new wrappers, and
//! repeated elements become a lazy [`Children`] sequence.
//!
//! ```
//! use zenxml::{Value, XmlObject};
//!
//! let doc = XmlObject::from_xml(
//!     r#"<Root><Item1>My Item 1</Item1><Item2 Attribute1="Test">x</Item2></Root>"#,
//! )?;
//! let root = doc.get("Root")?;
//! assert_eq!(root.get("Item1")?.as_text(), Some("My Item 1"));
//! assert_eq!(root.get("Item2")?.get("Attribute1")?.as_text(), Some("Test"));
//! assert!(matches!(root.get("Item3")?, Value::Absent));
//! # Ok::<(), zenxml::Error>(())
//! ```
//!
//! Only wrappers created by the `from_*` constructors carry the document
//! (tree and [`Options`]). Every other wrapper keeps a reference to the
//! wrapper it was resolved from and finds the document by walking upward.

mod ancestry;
mod classify;
mod invoke;
mod value;

pub use value::{ChildIter, Children, Value};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::coerce::{FromXmlText, Scalar, ScalarKind};
use crate::config::{Options, Unresolved};
use crate::error::{Error, Result};
use crate::node::{NodeId, XmlTree};
use crate::xml::{parse_file, parse_str, print_to_string_pretty};

use classify::{classify, is_leaf, Member};
use invoke::Invocation;

/// Document-wide state, stored once on the document wrapper.
#[derive(Debug)]
pub(crate) struct DocumentContext {
    tree: Arc<XmlTree>,
    options: Options,
}

struct ObjectInner {
    node: NodeId,
    document: Option<DocumentContext>,
    parent: Option<XmlObject>,
}

/// A navigation handle bound to one node of a document.
///
/// Cloning is cheap. Wrappers are immutable and can be shared between
/// threads.
#[derive(Clone)]
pub struct XmlObject {
    inner: Arc<ObjectInner>,
}

impl XmlObject {
    /// Parses `xml` with default options.
    pub fn from_xml(xml: &str) -> Result<XmlObject> {
        Self::from_xml_with(xml, Options::default())
    }

    /// Parses `xml` with the given options.
    ///
    /// Fails with [`Error::InvalidArgument`] for blank input, and with
    /// [`Error::Xml`] or [`Error::Parse`] if the text is not a well-formed
    /// document. All of these have [`ErrorKind::InvalidArgument`](crate::ErrorKind).
    pub fn from_xml_with(xml: &str, options: impl Into<Options>) -> Result<XmlObject> {
        if xml.trim().is_empty() {
            return Err(Error::invalid_argument("xml", "document text is empty"));
        }
        let tree = parse_str(xml)?;
        Ok(Self::attach(Arc::new(tree), options.into()))
    }

    /// Loads the document at `path` with default options.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<XmlObject> {
        Self::from_file_with(path, Options::default())
    }

    /// Loads the document at `path` with the given options.
    ///
    /// Fails with [`Error::InvalidArgument`] for a blank path and with
    /// [`Error::NotFound`] if nothing exists at `path`.
    pub fn from_file_with<P: AsRef<Path>>(path: P, options: impl Into<Options>) -> Result<XmlObject> {
        let path = path.as_ref();
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(Error::invalid_argument("path", "file path is empty"));
        }
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let tree = parse_file(path)?;
        Ok(Self::attach(Arc::new(tree), options.into()))
    }

    /// Wraps an already built tree with default options.
    pub fn from_tree(tree: impl Into<Arc<XmlTree>>) -> Result<XmlObject> {
        Self::from_tree_with(tree, Options::default())
    }

    /// Wraps an already built tree with the given options.
    ///
    /// Fails with [`Error::InvalidArgument`] if the tree has no root element.
    pub fn from_tree_with(
        tree: impl Into<Arc<XmlTree>>,
        options: impl Into<Options>,
    ) -> Result<XmlObject> {
        let tree = tree.into();
        if tree.root_element().is_none() {
            return Err(Error::invalid_argument("tree", "tree has no root element"));
        }
        Ok(Self::attach(tree, options.into()))
    }

    fn attach(tree: Arc<XmlTree>, options: Options) -> XmlObject {
        debug!(
            nodes = tree.len(),
            comparison = ?options.comparison,
            unresolved = ?options.unresolved,
            "created document wrapper"
        );
        XmlObject {
            inner: Arc::new(ObjectInner {
                node: XmlTree::DOCUMENT,
                document: Some(DocumentContext { tree, options }),
                parent: None,
            }),
        }
    }

    /// Creates a wrapper for `node` that resolves its document through `self`.
    pub(crate) fn derive(&self, node: NodeId) -> XmlObject {
        XmlObject {
            inner: Arc::new(ObjectInner {
                node,
                document: None,
                parent: Some(self.clone()),
            }),
        }
    }

    /// Returns the id of the bound node.
    pub fn node_id(&self) -> NodeId {
        self.inner.node
    }

    /// Returns true if this wrapper is bound to the document node.
    pub fn is_document(&self) -> bool {
        self.inner.node == XmlTree::DOCUMENT
    }

    /// Returns the wrapper this one was resolved from.
    pub fn parent(&self) -> Option<&XmlObject> {
        self.inner.parent.as_ref()
    }

    /// Returns the document tree.
    pub fn tree(&self) -> Result<&Arc<XmlTree>> {
        Ok(&self.context()?.tree)
    }

    /// Returns the document options.
    pub fn options(&self) -> Result<Options> {
        Ok(self.context()?.options)
    }

    /// Returns the local name of the bound element, `None` for the document.
    pub fn name(&self) -> Result<Option<&str>> {
        Ok(self.context()?.tree.local_name(self.inner.node))
    }

    /// Returns true if both wrappers are bound to the same node of the same tree.
    pub fn same_node(&self, other: &XmlObject) -> Result<bool> {
        Ok(self.inner.node == other.inner.node && Arc::ptr_eq(self.tree()?, other.tree()?))
    }

    /// Resolves a property-style member access (`obj.Name`).
    ///
    /// The reserved names `InnerText`, `AsEnumerable` and `As` are checked
    /// before attributes and child elements, using the document's comparison
    /// policy. An attribute or element with one of these names (or, under the
    /// default case-insensitive policy, a spelling such as `as` or
    /// `innertext`) cannot be reached through `get`; use
    /// [`as_enumerable`](Self::as_enumerable) or the [`tree`](Self::tree) instead.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.resolve(name, Invocation::Property)
    }

    /// Resolves a method-style member access (`obj.Name<T..>(args..)`).
    ///
    /// Only the `AsEnumerable` and `As` pseudo-methods are callable; any
    /// other name is unresolved.
    pub fn call(&self, name: &str, type_args: &[ScalarKind], args: &[Value]) -> Result<Value> {
        self.resolve(name, Invocation::Method { type_args, args })
    }

    /// Returns the root element wrapper. Only valid on the document wrapper.
    pub fn root(&self) -> Result<XmlObject> {
        let tree = self.tree()?;
        match tree.root_element() {
            Some(root) if self.is_document() => Ok(self.derive(root)),
            _ => Err(Error::InvalidOperation(
                "Root is only available on the document wrapper".to_string(),
            )),
        }
    }

    /// Returns the direct text of the bound element.
    pub fn inner_text(&self) -> Result<String> {
        invoke::inner_text(self.tree()?, self.inner.node)
    }

    /// Returns the child elements as a lazy, re-iterable sequence.
    pub fn as_enumerable(&self) -> Result<Children> {
        Ok(Children::all(self.clone(), Arc::clone(self.tree()?)))
    }

    /// Converts the text value of the bound node to `T`.
    pub fn as_type<T: FromXmlText>(&self) -> Result<T> {
        T::from_xml_text(&self.tree()?.text_value(self.inner.node))
    }

    /// Converts the text value of the bound node to a scalar of `kind`.
    pub fn coerce(&self, kind: ScalarKind) -> Result<Scalar> {
        kind.coerce(&self.tree()?.text_value(self.inner.node))
    }

    /// Serializes the bound subtree as indented XML.
    pub fn to_xml_string(&self) -> Result<String> {
        Ok(print_to_string_pretty(self.tree()?, self.inner.node))
    }

    fn resolve(&self, name: &str, invocation: Invocation<'_>) -> Result<Value> {
        let context = self.context()?;
        let tree = &context.tree;
        let node = self.inner.node;
        let member = classify(tree, node, name, context.options.comparison);
        trace!(
            member = name,
            node = node.index(),
            method = invocation.is_method(),
            outcome = ?member,
            "resolving member"
        );

        match member {
            Member::AsEnumerable => {
                invoke::check_as_enumerable(invocation)?;
                Ok(Value::Sequence(Children::all(self.clone(), Arc::clone(tree))))
            }
            Member::As => {
                let kind = invoke::as_target(invocation)?;
                Ok(Value::Scalar(kind.coerce(&tree.text_value(node))?))
            }
            _ if invocation.is_method() => self.unresolved(context, name),
            Member::Root(root) => Ok(Value::Object(self.derive(root))),
            Member::InnerText => Ok(Value::Text(invoke::inner_text(tree, node)?)),
            Member::Attribute(index) => {
                let value = tree
                    .element(node)
                    .and_then(|element| element.attributes().get(index))
                    .map(|attr| attr.value().to_string())
                    .unwrap_or_default();
                Ok(Value::Text(value))
            }
            Member::Element(child) if is_leaf(tree, child) => {
                Ok(Value::Text(tree.text_value(child)))
            }
            Member::Element(child) => Ok(Value::Object(self.derive(child))),
            Member::Elements => Ok(Value::Sequence(Children::named(
                self.clone(),
                Arc::clone(tree),
                name,
                context.options.comparison,
            ))),
            Member::NotFound => self.unresolved(context, name),
        }
    }

    fn unresolved(&self, context: &DocumentContext, name: &str) -> Result<Value> {
        match context.options.unresolved {
            Unresolved::Lenient => Ok(Value::Absent),
            Unresolved::Strict => Err(Error::UnresolvedMember {
                name: name.to_string(),
                node: context
                    .tree
                    .element(self.inner.node)
                    .map(|element| element.qname().to_string())
                    .unwrap_or_else(|| "#document".to_string()),
            }),
        }
    }
}

impl fmt::Display for XmlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xml = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

impl fmt::Debug for XmlObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlObject")
            .field("node", &self.inner.node)
            .field("name", &self.name().ok().flatten())
            .finish()
    }
}
