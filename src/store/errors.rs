//! # Store Errors
//!
//! Error types for the entity store contract.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Key string could not be decoded
    #[error("Malformed key: {0}")]
    BadKey(String),

    /// No entity stored under the key
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Key decoded fine but names another kind
    #[error("Key of kind '{actual}' used where '{expected}' was expected")]
    KindMismatch { expected: String, actual: String },

    /// Backend failure (poisoned lock, I/O, ...)
    #[error("Store failure: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether this error means "there is no such entity" as far as a client
    /// is concerned. Malformed and mistyped keys count.
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self,
            StoreError::BadKey(_) | StoreError::NotFound(_) | StoreError::KindMismatch { .. }
        )
    }
}
