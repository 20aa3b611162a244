//! ZenXml - member-style navigation over XML documents
//!
//! This library turns an XML document into a tree of lightweight handles that
//! are navigated by name, the way an object graph would be.
//!
//! # Overview
//!
//! A document is parsed once into an immutable arena ([`XmlTree`]). The
//! document wrapper ([`XmlObject`]) resolves member names against the node it
//! is bound to:
//!
//! - `Root` on the document steps to the root element
//! - an attribute name yields the attribute value
//! - a single child element without attributes or children yields its text
//! - any other single child element yields a new wrapper
//! - repeated child elements yield a lazy sequence of wrappers
//!
//! The reserved members `InnerText`, `AsEnumerable()` and `As<T>()` expose
//! the direct text of an element, its child elements, and a typed
//! conversion of its value.
//!
//! # Example
//!
//! ```
//! use zenxml::{Options, XmlObject};
//!
//! let xml = r#"<Root><Item1>My Item 1</Item1><Item4>4.0</Item4><Item4>4.1</Item4></Root>"#;
//! let doc = XmlObject::from_xml_with(xml, Options::default())?;
//! let root = doc.get("Root")?;
//!
//! assert_eq!(root.get("Item1")?.as_text(), Some("My Item 1"));
//!
//! let total: f64 = root
//!     .get("Item4")?
//!     .as_sequence()
//!     .into_iter()
//!     .flat_map(|items| items.iter())
//!     .map(|item| item.as_type::<f64>())
//!     .sum::<zenxml::Result<f64>>()?;
//! assert!((total - 8.1).abs() < 1e-9);
//! # Ok::<(), zenxml::Error>(())
//! ```

pub mod coerce;
pub mod config;
pub mod error;
pub mod node;
pub mod object;
pub mod xml;

// Re-export commonly used types
pub use coerce::{FromXmlText, Scalar, ScalarKind};
pub use config::{Comparison, Options, Unresolved};
pub use error::{Error, ErrorKind, Result};
pub use node::{
    ElementBuilder, NodeData, NodeId, XmlAttribute, XmlComment, XmlContent, XmlElement, XmlText,
    XmlTree,
};
pub use object::{ChildIter, Children, Value, XmlObject};
pub use xml::{
    parse_file, parse_str, print_to_string, print_to_string_pretty, XmlParser, XmlPrinter,
    XmlPrinterOptions,
};
