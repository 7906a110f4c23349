//! Built-in JSON and form-url-encoded parsers.

use super::errors::{ParseError, ParseResult};
use super::payload::{MultiDict, Payload};
use super::registry::Parser;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// `application/json` body -> JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn content_type(&self) -> &str {
        JSON_CONTENT_TYPE
    }

    fn parse(&self, body: &[u8]) -> ParseResult<Payload> {
        serde_json::from_slice(body)
            .map(Payload::Json)
            .map_err(|e| ParseError::Malformed(e.to_string()))
    }
}

/// `application/x-www-form-urlencoded` body -> ordered multi-valued pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlEncodedParser;

impl Parser for FormUrlEncodedParser {
    fn content_type(&self) -> &str {
        FORM_CONTENT_TYPE
    }

    fn parse(&self, body: &[u8]) -> ParseResult<Payload> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        Ok(Payload::Form(pairs.into_iter().collect::<MultiDict>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_parser() {
        let payload = JsonParser
            .parse(br#"{"number": 1, "title": "Eat an apple a day"}"#)
            .unwrap();
        assert_eq!(
            payload,
            Payload::Json(json!({"number": 1, "title": "Eat an apple a day"}))
        );
    }

    #[test]
    fn test_json_parser_rejects_garbage() {
        assert!(matches!(
            JsonParser.parse(b"{not json"),
            Err(ParseError::Malformed(_))
        ));
        assert!(matches!(JsonParser.parse(b""), Err(ParseError::Malformed(_))));
    }

    #[test]
    fn test_form_parser_preserves_repeats() {
        let payload = FormUrlEncodedParser
            .parse(b"title=Eat+an+apple&tag=red&tag=green&number=")
            .unwrap();

        let Payload::Form(form) = payload else {
            panic!("expected form payload");
        };
        assert_eq!(form.get("title"), Some("Eat an apple"));
        assert_eq!(form.get_all("tag"), vec!["red", "green"]);
        assert_eq!(form.get("number"), Some(""));
    }

    #[test]
    fn test_form_parser_empty_body() {
        let payload = FormUrlEncodedParser.parse(b"").unwrap();
        assert_eq!(payload, Payload::Form(MultiDict::new()));
    }
}
