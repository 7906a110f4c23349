//! # REST API Module
//!
//! Generic CRUD routes derived from model definitions.
//!
//! A route is a [`HandlerConfig`] (model, scoping, ordering, expansions) plus
//! a [`Capabilities`] set. Requests flow through:
//!
//! 1. body parsing (`POST`/`PUT` only) via the parser registry
//! 2. the enabled operation in [`operations`]
//! 3. the response [`pipeline`], which maps missing keys to 404, client
//!    errors to their status, and encodes results as JSON
//!
//! Errors that escape the pipeline render as `{"error": ..., "code": ...}`.

pub mod config;
pub mod errors;
pub mod operations;
pub mod pipeline;
pub mod resource;
pub mod router;

pub use config::HandlerConfig;
pub use errors::{ErrorResponse, RestError, RestResult};
pub use operations::{OperationContext, Reply};
pub use resource::{Capabilities, Resource, RouteKind};
pub use router::{validate_path, RestRouter, RestState, RouteInfo};
