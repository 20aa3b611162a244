//! Reserved pseudo-members: `InnerText`, `AsEnumerable()` and `As<T>()`.

use crate::coerce::ScalarKind;
use crate::error::{Error, Result};
use crate::node::{NodeId, XmlTree};

use super::value::Value;

/// How a member is being accessed.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Invocation<'a> {
    /// Property access: no type arguments, no arguments.
    Property,
    /// Method call with explicit type arguments and arguments.
    Method {
        type_args: &'a [ScalarKind],
        args: &'a [Value],
    },
}

impl<'a> Invocation<'a> {
    pub(crate) fn type_args(&self) -> &'a [ScalarKind] {
        match self {
            Invocation::Property => &[],
            Invocation::Method { type_args, .. } => type_args,
        }
    }

    pub(crate) fn args(&self) -> &'a [Value] {
        match self {
            Invocation::Property => &[],
            Invocation::Method { args, .. } => args,
        }
    }

    pub(crate) fn is_method(&self) -> bool {
        matches!(self, Invocation::Method { .. })
    }
}

/// Direct text of an element that has no child elements.
pub(crate) fn inner_text(tree: &XmlTree, node: NodeId) -> Result<String> {
    let Some(element) = tree.element(node) else {
        return Err(Error::InvalidOperation(
            "InnerText is only available on elements".to_string(),
        ));
    };
    if tree.has_elements(node) {
        return Err(Error::InvalidOperation(format!(
            "InnerText is not available on <{}>: it has child elements",
            element.qname()
        )));
    }
    if element.has_attributes() && !tree.has_text(node) {
        return Err(Error::InvalidOperation(format!(
            "InnerText is not available on <{}>: it has attributes and no text",
            element.qname()
        )));
    }
    Ok(tree.text_value(node))
}

/// Checks that `AsEnumerable` was called without type arguments or arguments.
pub(crate) fn check_as_enumerable(invocation: Invocation<'_>) -> Result<()> {
    let type_args = invocation.type_args();
    if !type_args.is_empty() {
        return Err(Error::InvalidOperation(format!(
            "The AsEnumerable method does not take type parameters. Type parameter list: [{}]",
            type_list(type_args)
        )));
    }
    let args = invocation.args();
    if !args.is_empty() {
        return Err(Error::InvalidOperation(format!(
            "AsEnumerable method must be called without parameters. Current parameter count: {}",
            args.len()
        )));
    }
    Ok(())
}

/// Validates an `As` call and returns its single type argument.
pub(crate) fn as_target(invocation: Invocation<'_>) -> Result<ScalarKind> {
    let kind = match invocation.type_args() {
        [] => {
            return Err(Error::InvalidOperation(
                "The As method must be called with a single type parameter.".to_string(),
            ))
        }
        [kind] => *kind,
        many => {
            return Err(Error::InvalidOperation(format!(
                "The As method must be called with a single type parameter. \
                 Current method call passed multiple type parameters. Type parameter list: [{}]",
                type_list(many)
            )))
        }
    };
    let args = invocation.args();
    if !args.is_empty() {
        return Err(Error::InvalidOperation(format!(
            "As method must be called without parameters. Current parameter count: {}",
            args.len()
        )));
    }
    Ok(kind)
}

fn type_list(kinds: &[ScalarKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}
