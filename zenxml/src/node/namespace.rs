//! Qualified-name helpers.
//!
//! Member lookup matches on local names only; prefixes and namespace URIs are
//! not distinguished.

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some(pos) = qname.find(':') {
        (Some(&qname[..pos]), &qname[pos + 1..])
    } else {
        (None, qname)
    }
}

/// Returns the local part of a qualified name.
pub fn local_name(qname: &str) -> &str {
    split_qname(qname).1
}
