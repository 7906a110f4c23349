//! # Parser Errors

use thiserror::Error;

/// Result type for body parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Body parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No parser registered for the declared content type
    #[error("Content type not supported: {0}")]
    ContentTypeNotSupported(String),

    /// A parser was found but the body does not decode
    #[error("Malformed request body: {0}")]
    Malformed(String),
}
