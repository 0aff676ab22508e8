//! Store error types.

use super::attrs::ElementType;
use super::diff::DiffId;
use super::key::ElementId;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementalError {
    /// An element id that was never created or has been deleted.
    UnknownElement {
        element_type: ElementType,
        id: ElementId,
    },
    /// A bulk attribute write repeated a key; nothing was applied.
    DuplicateKey { attr: &'static str },
    /// An update tried to create an element with an id already in use.
    DuplicateElement {
        element_type: ElementType,
        id: ElementId,
    },
    /// A diff tracker used after its removal.
    UsedAfterRemoval { diff: DiffId },
}

impl ElementalError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ElementalError::UnknownElement { .. } => "ELEMENT_UNKNOWN",
            ElementalError::DuplicateKey { .. } => "ATTR_DUPLICATE_KEY",
            ElementalError::DuplicateElement { .. } => "ELEMENT_DUPLICATE_ID",
            ElementalError::UsedAfterRemoval { .. } => "DIFF_USED_AFTER_REMOVAL",
        }
    }
}

impl std::fmt::Display for ElementalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementalError::UnknownElement { element_type, id } => write!(
                f,
                "[{}] No {} with id {} (never created or deleted)",
                self.code(),
                element_type,
                id
            ),
            ElementalError::DuplicateKey { attr } => write!(
                f,
                "[{}] Bulk write to {} repeated a key; nothing was applied",
                self.code(),
                attr
            ),
            ElementalError::DuplicateElement { element_type, id } => write!(
                f,
                "[{}] A {} with id {} already exists",
                self.code(),
                element_type,
                id
            ),
            ElementalError::UsedAfterRemoval { diff } => write!(
                f,
                "[{}] Update tracker {} was removed and may not be used",
                self.code(),
                diff.inner()
            ),
        }
    }
}

impl std::error::Error for ElementalError {}

#[cfg(test)]
mod tests {
    use super::{ElementalError, ElementType};
    use crate::elemental::diff::DiffId;

    #[test]
    fn error_code_is_stable() {
        let err = ElementalError::UnknownElement {
            element_type: ElementType::Variable,
            id: 3,
        };
        assert_eq!(err.code(), "ELEMENT_UNKNOWN");
        assert_eq!(
            ElementalError::UsedAfterRemoval { diff: DiffId::new(0) }.code(),
            "DIFF_USED_AFTER_REMOVAL"
        );
    }

    #[test]
    fn display_prefixes_error_code() {
        let err = ElementalError::UnknownElement {
            element_type: ElementType::LinearConstraint,
            id: 9,
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ELEMENT_UNKNOWN]"));
        assert!(rendered.contains("linear_constraint"));
        assert!(rendered.contains('9'));
    }
}
