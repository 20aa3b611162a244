//! Error types for zenxml.

use thiserror::Error;

/// Result type alias for zenxml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or navigating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A constructor received missing or blank input.
    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// XML parse error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// The referenced file does not exist.
    #[error("File specified by path {0} does not exist")]
    NotFound(String),

    /// A pseudo-member was used in a way it does not support.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A node value could not be converted to the requested type.
    #[error("Cannot convert {value:?} to {target}: {reason}")]
    TypeCoercion {
        /// The text that was being converted.
        value: String,
        /// Name of the requested target type.
        target: &'static str,
        /// Why the conversion failed.
        reason: String,
    },

    /// A member name matched neither an attribute nor a child element.
    #[error("No attribute or element named `{name}` on <{node}>")]
    UnresolvedMember {
        /// The requested member name.
        name: String,
        /// Name of the node the lookup ran against.
        node: String,
    },

    /// A wrapper has no ancestor carrying the document context.
    #[error("Wrapper is not attached to a document")]
    Detached,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML reader rejected the document.
    #[error("XML error at byte {position}: {source}")]
    Xml {
        /// Error reported by quick-xml.
        #[source]
        source: quick_xml::Error,
        /// Reader position when the error was reported.
        position: u64,
    },
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad or missing constructor input, including unparsable documents.
    InvalidArgument,
    /// A referenced file is absent.
    NotFound,
    /// A pseudo-member was misused.
    InvalidOperation,
    /// Scalar conversion failed.
    TypeCoercion,
    /// Strict lookup of a name that does not exist.
    UnresolvedMember,
    /// Reading the document failed.
    Io,
    /// Internal consistency failure.
    Internal,
}

impl Error {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument { .. } | Error::Parse(_) | Error::Xml { .. } => {
                ErrorKind::InvalidArgument
            }
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::TypeCoercion { .. } => ErrorKind::TypeCoercion,
            Error::UnresolvedMember { .. } => ErrorKind::UnresolvedMember,
            Error::Io(_) => ErrorKind::Io,
            Error::Detached => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_count_as_invalid_argument() {
        assert_eq!(
            Error::Parse("unexpected end".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::invalid_argument("xml", "blank").kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_unresolved_message_names_member_and_node() {
        let err = Error::UnresolvedMember {
            name: "item1".into(),
            node: "Root".into(),
        };
        assert_eq!(err.to_string(), "No attribute or element named `item1` on <Root>");
    }
}
