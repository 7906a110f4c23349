//! # Content Parsers
//!
//! Maps a request's declared content type to a decoder that turns the raw
//! body into a structured [`Payload`].
//!
//! The registry is an ordinary value handed to the router, not process
//! state. [`ParserRegistry::default`] knows two content types:
//!
//! - `application/json`: body is a JSON document
//! - `application/x-www-form-urlencoded`: body is form pairs; a name may
//!   repeat and every value is kept, in order

mod builtin;
mod errors;
mod payload;
mod registry;

pub use builtin::{FormUrlEncodedParser, JsonParser, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use errors::{ParseError, ParseResult};
pub use payload::{MultiDict, Payload, RawField};
pub use registry::{normalize_content_type, Parser, ParserRegistry};
