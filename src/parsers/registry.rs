//! # Parser Registry
//!
//! Content type -> parser lookup table.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::builtin::{FormUrlEncodedParser, JsonParser};
use super::errors::{ParseError, ParseResult};
use super::payload::Payload;

/// A body decoder for one content type
pub trait Parser: Send + Sync {
    /// Content type this parser handles, e.g. `application/json`
    fn content_type(&self) -> &str;

    /// Decode a raw body
    fn parse(&self, body: &[u8]) -> ParseResult<Payload>;
}

/// Strip parameters and normalize case: `Application/JSON; charset=utf-8`
/// becomes `application/json`.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// Registered parsers, keyed by normalized content type
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn Parser>>,
}

impl ParserRegistry {
    /// Registry with no parsers at all
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Insert a parser, replacing any parser already registered for the
    /// same content type. Returns the replaced parser.
    pub fn register<P: Parser + 'static>(&mut self, parser: P) -> Option<Arc<dyn Parser>> {
        let key = normalize_content_type(parser.content_type());
        self.parsers.insert(key, Arc::new(parser))
    }

    /// Remove whatever is registered under `parser`'s content type.
    pub fn deregister(&mut self, parser: &dyn Parser) -> Option<Arc<dyn Parser>> {
        let key = normalize_content_type(parser.content_type());
        self.parsers.remove(&key)
    }

    /// Parser for a (raw, un-normalized) content type
    pub fn get(&self, content_type: &str) -> Option<&Arc<dyn Parser>> {
        self.parsers.get(&normalize_content_type(content_type))
    }

    /// Registered content types, sorted
    pub fn content_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Decode `body` with the parser registered for `content_type`.
    ///
    /// A missing header is treated like an unknown content type.
    pub fn parse(&self, content_type: Option<&str>, body: &[u8]) -> ParseResult<Payload> {
        let declared = content_type.unwrap_or("");
        let parser = self
            .get(declared)
            .ok_or_else(|| ParseError::ContentTypeNotSupported(normalize_content_type(declared)))?;
        parser.parse(body)
    }
}

impl Default for ParserRegistry {
    /// JSON and form-url-encoded
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(JsonParser);
        registry.register(FormUrlEncodedParser);
        registry
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("content_types", &self.content_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
    use serde_json::json;

    struct CsvParser;

    impl Parser for CsvParser {
        fn content_type(&self) -> &str {
            "text/csv"
        }

        fn parse(&self, body: &[u8]) -> ParseResult<Payload> {
            let text = std::str::from_utf8(body)
                .map_err(|e| ParseError::Malformed(e.to_string()))?;
            let values: Vec<serde_json::Value> =
                text.split(',').map(|s| json!(s.trim())).collect();
            Ok(Payload::Json(serde_json::Value::Array(values)))
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = ParserRegistry::default();
        assert_eq!(
            registry.content_types(),
            vec![JSON_CONTENT_TYPE, FORM_CONTENT_TYPE]
        );
    }

    #[test]
    fn test_content_type_normalization() {
        assert_eq!(
            normalize_content_type("Application/JSON; charset=UTF-8"),
            "application/json"
        );
        assert_eq!(normalize_content_type("  text/csv "), "text/csv");
        assert_eq!(normalize_content_type(""), "");

        let registry = ParserRegistry::default();
        let payload = registry
            .parse(Some("application/json; charset=utf-8"), br#"{"a": 1}"#)
            .unwrap();
        assert_eq!(payload, Payload::Json(json!({"a": 1})));
    }

    #[test]
    fn test_unsupported_content_type() {
        let registry = ParserRegistry::default();
        let result = registry.parse(Some("text/csv"), b"a,b");
        assert_eq!(
            result,
            Err(ParseError::ContentTypeNotSupported("text/csv".to_string()))
        );

        let missing = registry.parse(None, b"{}");
        assert!(matches!(missing, Err(ParseError::ContentTypeNotSupported(_))));
    }

    #[test]
    fn test_register_and_deregister() {
        let mut registry = ParserRegistry::default();
        assert!(registry.register(CsvParser).is_none());

        let payload = registry.parse(Some("text/csv"), b"a, b").unwrap();
        assert_eq!(payload, Payload::Json(json!(["a", "b"])));

        assert!(registry.deregister(&CsvParser).is_some());
        assert!(registry.get("text/csv").is_none());
        assert!(registry.deregister(&CsvParser).is_none());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = ParserRegistry::default();
        let replaced = registry.register(JsonParser);
        assert!(replaced.is_some());
        assert_eq!(registry.content_types().len(), 2);
    }
}
