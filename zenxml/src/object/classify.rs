//! Member classification.
//!
//! Decides what a requested name refers to at a given node. The order of the
//! checks is fixed: root escape, reserved pseudo-members, attributes, then
//! child elements.

use crate::config::Comparison;
use crate::node::{NodeId, XmlTree};

/// Name that escapes from the document node to the root element.
pub(crate) const ROOT: &str = "Root";
/// Pseudo-member returning the direct text of an element.
pub(crate) const INNER_TEXT: &str = "InnerText";
/// Pseudo-method enumerating child elements.
pub(crate) const AS_ENUMERABLE: &str = "AsEnumerable";
/// Pseudo-method converting the node value to a scalar.
pub(crate) const AS: &str = "As";

/// What a member name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Member {
    /// `Root` on the document node.
    Root(NodeId),
    /// The `InnerText` pseudo-member.
    InnerText,
    /// The `AsEnumerable` pseudo-method.
    AsEnumerable,
    /// The `As` pseudo-method.
    As,
    /// Attribute at this index of the element's attribute list.
    Attribute(usize),
    /// Exactly one child element matched.
    Element(NodeId),
    /// Two or more child elements matched.
    Elements,
    /// Nothing matched.
    NotFound,
}

/// Classifies `name` against `node`.
pub(crate) fn classify(tree: &XmlTree, node: NodeId, name: &str, comparison: Comparison) -> Member {
    if node == XmlTree::DOCUMENT && comparison.matches(name, ROOT) {
        if let Some(root) = tree.root_element() {
            return Member::Root(root);
        }
    }

    if comparison.matches(name, INNER_TEXT) {
        return Member::InnerText;
    }
    if comparison.matches(name, AS_ENUMERABLE) {
        return Member::AsEnumerable;
    }
    if comparison.matches(name, AS) {
        return Member::As;
    }

    if let Some(element) = tree.element(node) {
        let attribute = element
            .attributes()
            .iter()
            .position(|attr| comparison.matches(name, attr.local_name()));
        if let Some(index) = attribute {
            return Member::Attribute(index);
        }
    }

    let mut matches = matching_children(tree, node, name, comparison);
    match (matches.next(), matches.next()) {
        (None, _) => Member::NotFound,
        (Some(child), None) => Member::Element(child),
        (Some(_), Some(_)) => Member::Elements,
    }
}

/// Child elements of `node` whose local name matches `name`, in document order.
pub(crate) fn matching_children<'a>(
    tree: &'a XmlTree,
    node: NodeId,
    name: &'a str,
    comparison: Comparison,
) -> impl Iterator<Item = NodeId> + 'a {
    tree.element_children(node).filter(move |&child| {
        tree.local_name(child)
            .is_some_and(|local| comparison.matches(name, local))
    })
}

/// Returns true if a single matched child collapses to its text.
pub(crate) fn is_leaf(tree: &XmlTree, node: NodeId) -> bool {
    !tree.has_attributes(node) && !tree.has_elements(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ElementBuilder;

    const CI: Comparison = Comparison::CaseInsensitive;
    const CS: Comparison = Comparison::CaseSensitive;

    fn tree() -> XmlTree {
        XmlTree::from_root(
            ElementBuilder::new("Root")
                .attr("Kind", "attr")
                .child(ElementBuilder::new("Item1").text("My Item 1"))
                .child(ElementBuilder::new("Kind").text("element"))
                .child(ElementBuilder::new("Item4").text("4.0"))
                .child(ElementBuilder::new("Item4").text("4.1"))
                .child(ElementBuilder::new("p:Prefixed").attr("x:Code", "7"))
                .child(ElementBuilder::new("Root").text("nested")),
        )
    }

    fn root(tree: &XmlTree) -> NodeId {
        tree.root_element().unwrap()
    }

    #[test]
    fn test_root_escape_on_document() {
        let tree = tree();
        assert_eq!(
            classify(&tree, XmlTree::DOCUMENT, "Root", CI),
            Member::Root(root(&tree))
        );
        assert_eq!(
            classify(&tree, XmlTree::DOCUMENT, "root", CI),
            Member::Root(root(&tree))
        );
    }

    #[test]
    fn test_root_respects_case_policy() {
        let tree = tree();
        // Neither the escape nor the element named `Root` match under exact comparison.
        assert_eq!(
            classify(&tree, XmlTree::DOCUMENT, "root", CS),
            Member::NotFound
        );
    }

    #[test]
    fn test_root_below_document_is_an_element_name() {
        let tree = tree();
        let nested = tree.element_children(root(&tree)).last().unwrap();
        assert_eq!(classify(&tree, root(&tree), "Root", CI), Member::Element(nested));
    }

    #[test]
    fn test_pseudo_members() {
        let tree = tree();
        let r = root(&tree);
        assert_eq!(classify(&tree, r, "InnerText", CI), Member::InnerText);
        assert_eq!(classify(&tree, r, "asenumerable", CI), Member::AsEnumerable);
        assert_eq!(classify(&tree, r, "As", CS), Member::As);
        assert_eq!(classify(&tree, r, "as", CS), Member::NotFound);
    }

    #[test]
    fn test_attribute_wins_over_element() {
        let tree = tree();
        assert_eq!(classify(&tree, root(&tree), "Kind", CI), Member::Attribute(0));
    }

    #[test]
    fn test_single_and_multiple_elements() {
        let tree = tree();
        let r = root(&tree);
        let item1 = tree.element_children(r).next().unwrap();
        assert_eq!(classify(&tree, r, "item1", CI), Member::Element(item1));
        assert_eq!(classify(&tree, r, "item1", CS), Member::NotFound);
        assert_eq!(classify(&tree, r, "Item4", CI), Member::Elements);
        assert_eq!(matching_children(&tree, r, "ITEM4", CI).count(), 2);
    }

    #[test]
    fn test_local_name_matching_ignores_prefix() {
        let tree = tree();
        let r = root(&tree);
        let prefixed = tree.element_children(r).nth(4).unwrap();
        assert_eq!(classify(&tree, r, "Prefixed", CI), Member::Element(prefixed));
        assert_eq!(classify(&tree, prefixed, "code", CI), Member::Attribute(0));
    }

    #[test]
    fn test_document_has_no_attributes() {
        let tree = tree();
        assert_eq!(classify(&tree, XmlTree::DOCUMENT, "Kind", CI), Member::NotFound);
    }

    #[test]
    fn test_leaf_detection() {
        let tree = tree();
        let r = root(&tree);
        let item1 = tree.element_children(r).next().unwrap();
        let prefixed = tree.element_children(r).nth(4).unwrap();
        assert!(is_leaf(&tree, item1));
        assert!(!is_leaf(&tree, prefixed));
        assert!(!is_leaf(&tree, r));
    }
}
