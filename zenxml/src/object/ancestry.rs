//! Parent chain of derived wrappers.
//!
//! Derived wrappers do not store the document. Lookups walk the chain of
//! parents until they reach the wrapper created by a constructor.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::{DocumentContext, ObjectInner, XmlObject};

impl XmlObject {
    /// Finds the document context by walking up the parent chain.
    pub(crate) fn context(&self) -> Result<&DocumentContext> {
        let mut current = self;
        loop {
            if let Some(document) = &current.inner.document {
                return Ok(document);
            }
            match &current.inner.parent {
                Some(parent) => current = parent,
                None => return Err(Error::Detached),
            }
        }
    }

    /// Iterates over this wrapper and its parents, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &XmlObject> {
        std::iter::successors(Some(self), |object| object.inner.parent.as_ref())
    }
}

// Long chains would otherwise be released recursively, one stack frame per
// link.
impl Drop for ObjectInner {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(object) = next {
            next = match Arc::try_unwrap(object.inner) {
                Ok(mut inner) => inner.parent.take(),
                Err(_) => None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::node::NodeId;
    use crate::node::XmlTree;

    fn detached(node: NodeId) -> XmlObject {
        XmlObject {
            inner: Arc::new(ObjectInner {
                node,
                document: None,
                parent: None,
            }),
        }
    }

    #[test]
    fn test_context_found_through_parents() {
        let doc = XmlObject::from_xml("<a><b><c x=\"1\"/></b></a>").unwrap();
        let c = doc
            .get("Root")
            .unwrap()
            .get("b")
            .unwrap()
            .get("c")
            .unwrap()
            .into_object()
            .unwrap();
        assert!(Arc::ptr_eq(c.tree().unwrap(), doc.tree().unwrap()));
        assert_eq!(c.ancestors().count(), 4);
        assert!(c.ancestors().last().unwrap().is_document());
    }

    #[test]
    fn test_detached_wrapper_fails() {
        let orphan = detached(XmlTree::DOCUMENT);
        let err = orphan.get("Root").unwrap_err();
        assert!(matches!(err, Error::Detached));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(orphan.tree().is_err());
        assert!(orphan.derive(XmlTree::DOCUMENT).options().is_err());
    }

    #[test]
    fn test_derived_wrapper_outlives_handles() {
        let leaf = {
            let doc = XmlObject::from_xml("<a><b k=\"v\"><c/></b></a>").unwrap();
            doc.root().unwrap().get("b").unwrap().into_object().unwrap()
        };
        assert_eq!(leaf.get("k").unwrap().as_text(), Some("v"));
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let doc = XmlObject::from_xml("<a/>").unwrap();
        let root = doc.root().unwrap().node_id();
        let mut current = doc;
        for _ in 0..200_000 {
            current = current.derive(root);
        }
        assert_eq!(current.name().unwrap(), Some("a"));
        drop(current);
    }

    #[test]
    fn test_shared_parent_survives_child_drop() {
        let doc = XmlObject::from_xml("<a><b x=\"1\"/><b x=\"2\"/></a>").unwrap();
        let root = doc.root().unwrap();
        let first = root.as_enumerable().unwrap().get(0).unwrap();
        drop(first);
        assert_eq!(root.as_enumerable().unwrap().len(), 2);
    }
}
