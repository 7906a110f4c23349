//! # Response Pipeline
//!
//! Wraps every operation: maps missing keys and client errors to responses,
//! picks the success status from the method and encodes the result.
//!
//! | Outcome                     | Status          | Body                    |
//! |-----------------------------|-----------------|-------------------------|
//! | missing / bad key           | 404             | `"Error 404 Not Found"` |
//! | client error                | carried status  | JSON string message     |
//! | success, `POST`             | 201             | JSON result             |
//! | success, `DELETE`           | 204             | empty, no content type  |
//! | success, anything else      | 200             | JSON result             |
//!
//! Everything else is returned as `Err` for the caller to deal with.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;
use tracing::warn;

use super::errors::{RestError, RestResult};
use super::operations::Reply;

/// Body written for every missing-key failure
pub const NOT_FOUND_MESSAGE: &str = "Error 404 Not Found";

/// Success status for a method
pub fn success_status(method: &Method) -> StatusCode {
    if *method == Method::POST {
        StatusCode::CREATED
    } else if *method == Method::DELETE {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::OK
    }
}

/// Run `op` and turn its outcome into a response.
pub fn run<F>(method: &Method, op: F) -> RestResult<Response>
where
    F: FnOnce() -> RestResult<Reply>,
{
    match op() {
        Ok(reply) => Ok(encode(success_status(method), reply)),
        Err(RestError::NotFound(detail)) => {
            warn!(%method, %detail, "not found");
            Ok(encode(
                StatusCode::NOT_FOUND,
                Reply::Json(JsonValue::from(NOT_FOUND_MESSAGE)),
            ))
        }
        Err(RestError::Client { status, message }) if status.is_client_error() => {
            warn!(%method, status = status.as_u16(), %message, "client error");
            Ok(encode(status, Reply::Json(JsonValue::String(message))))
        }
        Err(other) => Err(other),
    }
}

/// JSON response, except that 204 carries neither body nor content type.
fn encode(status: StatusCode, reply: Reply) -> Response {
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, Json(reply.into_json())).into_response()
}
