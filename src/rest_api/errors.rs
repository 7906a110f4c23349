//! # REST API Errors
//!
//! Error types for the REST layer. Subsystem errors convert into `RestError`
//! so operations can use `?` throughout; the pipeline then decides which of
//! them become mapped responses and which escape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::flatten::FlattenError;
use crate::model::ModelError;
use crate::parsers::ParseError;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Mapped by the pipeline
    // ==================
    /// Missing, malformed or mistyped key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client error carrying its own status
    #[error("{message}")]
    Client { status: StatusCode, message: String },

    // ==================
    // Rejected before the operation runs
    // ==================
    /// No parser for the request content type
    #[error("Content type not supported: {0}")]
    UnsupportedContentType(String),

    /// Body does not decode under its content type
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// An expanded reference could not be followed
    #[error("Expansion failed: {0}")]
    MissingExpansion(String),

    /// Broken model or handler definition
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store backend failure
    #[error("Store error: {0}")]
    Store(String),
}

impl RestError {
    /// Client error with an explicit status
    pub fn client(status: StatusCode, message: impl Into<String>) -> Self {
        RestError::Client {
            status,
            message: message.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Client { status, .. } => *status,

            RestError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::MalformedBody(_) => StatusCode::BAD_REQUEST,

            RestError::MissingExpansion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        if err.is_missing_key() {
            RestError::NotFound(err.to_string())
        } else {
            RestError::Store(err.to_string())
        }
    }
}

impl From<ModelError> for RestError {
    fn from(err: ModelError) -> Self {
        if err.is_client_error() {
            RestError::client(StatusCode::BAD_REQUEST, err.to_string())
        } else {
            RestError::Configuration(err.to_string())
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
        RestError::client(status, err.to_string())
    }
}

impl From<ParseError> for RestError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::ContentTypeNotSupported(ct) => RestError::UnsupportedContentType(ct),
            ParseError::Malformed(reason) => RestError::MalformedBody(reason),
        }
    }
}

impl From<FlattenError> for RestError {
    fn from(err: FlattenError) -> Self {
        match err {
            FlattenError::Store(store) => store.into(),
            other => RestError::MissingExpansion(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
