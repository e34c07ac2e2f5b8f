//! Error category classification.
//!
//! Categories give callers a coarse handle on a failure without matching on
//! every concrete error variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Item store read or write failures.
    /// Often transient (locked database, busy disk).
    Storage,

    /// Code generation failures (bad secret, unsupported algorithm).
    /// Not retryable until the item is corrected.
    Generation,

    /// Export encoding or sink failures.
    Export,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Storage)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Storage => "storage",
            ErrorCategory::Generation => "generation",
            ErrorCategory::Export => "export",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Storage => "Item storage problem",
            ErrorCategory::Generation => "Verification code could not be generated",
            ErrorCategory::Export => "Export failed",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Storage.is_retryable());
        assert!(!ErrorCategory::Generation.is_retryable());
        assert!(!ErrorCategory::Export.is_retryable());
    }

    #[test]
    fn test_category_as_str() {
        assert_eq!(ErrorCategory::Storage.as_str(), "storage");
        assert_eq!(ErrorCategory::Generation.as_str(), "generation");
        assert_eq!(ErrorCategory::Export.as_str(), "export");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Storage), "storage");
        assert!(ErrorCategory::Export.description().contains("Export"));
    }
}
