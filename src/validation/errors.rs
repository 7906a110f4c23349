//! Validation error types

use thiserror::Error;

/// Result type for cleaning
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Cleaning failures. All of them are the client's fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// JSON body is an array, number, ...
    #[error("Request body must be an object, got {0}")]
    NotAnObject(&'static str),

    /// Value has the wrong JSON type
    #[error("Field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Value has the right shape but does not convert
    #[error("Field '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Offending field, if the error is about one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::NotAnObject(_) => None,
            ValidationError::TypeMismatch { field, .. } | ValidationError::Invalid { field, .. } => {
                Some(field)
            }
        }
    }

    /// HTTP status reported for this error
    pub fn status_code(&self) -> u16 {
        400
    }
}
