//! Document-wide navigation settings.
//!
//! Settings are fixed when a document wrapper is created and shared by every
//! wrapper derived from it.

/// How member names are compared against attribute and element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparison {
    /// Names must match exactly.
    CaseSensitive,
    /// Names match ignoring case.
    #[default]
    CaseInsensitive,
}

impl Comparison {
    /// Tests whether `candidate` matches the requested `name`.
    pub fn matches(self, name: &str, candidate: &str) -> bool {
        match self {
            Comparison::CaseSensitive => name == candidate,
            Comparison::CaseInsensitive => {
                name.eq_ignore_ascii_case(candidate)
                    || (!name.is_ascii() && name.to_lowercase() == candidate.to_lowercase())
            }
        }
    }
}

/// What a lookup returns when a name matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unresolved {
    /// Fail with [`Error::UnresolvedMember`](crate::Error::UnresolvedMember).
    Strict,
    /// Succeed with [`Value::Absent`](crate::Value::Absent).
    #[default]
    Lenient,
}

/// Options for building a document wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Name comparison policy.
    pub comparison: Comparison,
    /// Unresolved-member policy.
    pub unresolved: Unresolved,
}

impl Options {
    /// Creates the default options (case-insensitive, lenient).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comparison policy.
    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// Sets the unresolved-member policy.
    pub fn with_unresolved(mut self, unresolved: Unresolved) -> Self {
        self.unresolved = unresolved;
        self
    }

    /// Shorthand for case-sensitive options.
    pub fn case_sensitive() -> Self {
        Self::default().with_comparison(Comparison::CaseSensitive)
    }

    /// Shorthand for strict options.
    pub fn strict() -> Self {
        Self::default().with_unresolved(Unresolved::Strict)
    }
}

impl From<Comparison> for Options {
    fn from(comparison: Comparison) -> Self {
        Options::default().with_comparison(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.comparison, Comparison::CaseInsensitive);
        assert_eq!(options.unresolved, Unresolved::Lenient);
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert!(Comparison::CaseInsensitive.matches("item1", "Item1"));
        assert!(Comparison::CaseInsensitive.matches("STRASSE", "strasse"));
        assert!(Comparison::CaseInsensitive.matches("ÄPFEL", "äpfel"));
        assert!(!Comparison::CaseInsensitive.matches("item", "item1"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        assert!(Comparison::CaseSensitive.matches("Item1", "Item1"));
        assert!(!Comparison::CaseSensitive.matches("item1", "Item1"));
    }

    #[test]
    fn test_builders() {
        let options = Options::case_sensitive().with_unresolved(Unresolved::Strict);
        assert_eq!(options.comparison, Comparison::CaseSensitive);
        assert_eq!(options.unresolved, Unresolved::Strict);
        assert_eq!(Options::strict().comparison, Comparison::CaseInsensitive);
        assert_eq!(
            Options::from(Comparison::CaseSensitive),
            Options::case_sensitive()
        );
    }
}
