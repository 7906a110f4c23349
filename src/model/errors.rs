//! Model error types

use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Model errors
///
/// The first group describes broken model or handler definitions and is a
/// server-side problem. The second group describes entities that do not fit
/// their model and is reported back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    // ==================
    // Definition errors
    // ==================
    /// Kind is not registered
    #[error("Unknown model kind: {0}")]
    UnknownKind(String),

    /// Kind registered twice
    #[error("Model kind '{0}' is already registered")]
    DuplicateKind(String),

    /// Model definition is malformed
    #[error("Invalid model '{kind}': {reason}")]
    InvalidModel { kind: String, reason: String },

    /// Property exists but is not a reference
    #[error("'{kind}.{property}' is not a reference property")]
    NotAReference { kind: String, property: String },

    // ==================
    // Entity errors
    // ==================
    /// Property is not declared on the model
    #[error("'{kind}' has no property '{property}'")]
    UnknownProperty { kind: String, property: String },

    /// Required property is null or absent
    #[error("Property '{property}' is required")]
    MissingRequired { kind: String, property: String },

    /// Reference points at the wrong kind
    #[error("Property '{property}' must reference '{expected}', got '{actual}'")]
    WrongTarget {
        property: String,
        expected: String,
        actual: String,
    },

    /// Entity key does not belong to the model
    #[error("Entity of kind '{actual}' cannot be built as '{expected}'")]
    KindMismatch { expected: String, actual: String },
}

impl ModelError {
    /// Whether the error was caused by request content rather than by the
    /// model or handler definitions.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ModelError::UnknownProperty { .. }
                | ModelError::MissingRequired { .. }
                | ModelError::WrongTarget { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_split() {
        assert!(ModelError::MissingRequired {
            kind: "Story".into(),
            property: "title".into(),
        }
        .is_client_error());
        assert!(!ModelError::UnknownKind("Story".into()).is_client_error());
        assert!(!ModelError::NotAReference {
            kind: "Story".into(),
            property: "title".into(),
        }
        .is_client_error());
    }

    #[test]
    fn test_messages_name_the_property() {
        let err = ModelError::MissingRequired {
            kind: "Story".into(),
            property: "title".into(),
        };
        assert!(err.to_string().contains("title"));
    }
}
