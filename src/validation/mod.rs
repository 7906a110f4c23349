//! Payload cleaning for serene
//!
//! Turns a parsed request payload into typed property values for one model.
//!
//! # Rules
//!
//! - Only declared properties that appear in the payload are returned
//! - Undeclared fields are ignored (one body is cleaned against several models)
//! - Blank strings and explicit nulls become null
//! - Form values are text and are coerced to the property type
//! - Required-ness is not checked here; see `ModelDef::validate_entity`

mod cleaner;
mod errors;

pub use cleaner::{clean, Content};
pub use errors::{ValidationError, ValidationResult};
