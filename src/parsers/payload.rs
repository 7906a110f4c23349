//! # Parsed Payloads
//!
//! The structured form of a request body, as produced by a parser and
//! consumed by the cleaning step.

use serde_json::Value as JsonValue;

/// Ordered multi-valued mapping.
///
/// Unlike a plain map a name may appear several times; every pair is kept
/// in the order it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDict {
    pairs: Vec<(String, String)>,
}

impl MultiDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Last value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Number of pairs, counting repeats
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for MultiDict {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Decoded request body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(JsonValue),
    Form(MultiDict),
}

/// One field of a payload, before cleaning
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawField<'a> {
    Json(&'a JsonValue),
    Text(&'a str),
}

impl Payload {
    /// Look up a top-level field. JSON documents that are not objects have
    /// no fields.
    pub fn field(&self, name: &str) -> Option<RawField<'_>> {
        match self {
            Payload::Json(doc) => doc.as_object()?.get(name).map(RawField::Json),
            Payload::Form(form) => form.get(name).map(RawField::Text),
        }
    }

    /// Whether the payload has named fields at all
    pub fn is_keyed(&self) -> bool {
        match self {
            Payload::Json(doc) => doc.is_object(),
            Payload::Form(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multidict_keeps_duplicates() {
        let mut form = MultiDict::new();
        form.push("tag", "red");
        form.push("title", "Eat");
        form.push("tag", "green");

        assert_eq!(form.len(), 3);
        assert_eq!(form.get("tag"), Some("green"));
        assert_eq!(form.get_all("tag"), vec!["red", "green"]);
        assert_eq!(form.get("title"), Some("Eat"));
        assert_eq!(form.get("number"), None);
    }

    #[test]
    fn test_payload_field_lookup() {
        let doc = Payload::Json(json!({"title": "Eat", "number": 1}));
        assert_eq!(doc.field("number"), Some(RawField::Json(&json!(1))));
        assert_eq!(doc.field("status"), None);

        let list = Payload::Json(json!([1, 2]));
        assert!(!list.is_keyed());
        assert_eq!(list.field("0"), None);

        let form: MultiDict = vec![("title".to_string(), "Eat".to_string())]
            .into_iter()
            .collect();
        assert_eq!(Payload::Form(form).field("title"), Some(RawField::Text("Eat")));
    }
}
