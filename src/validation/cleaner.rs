//! Payload cleaner
//!
//! Coerces raw payload fields into property values, one declared property at
//! a time. Cleaning does not mutate the payload and is deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::model::{Model, PropertyDef, PropertyType};
use crate::parsers::{Payload, RawField};
use crate::store::{EntityKey, Value};

use super::errors::{ValidationError, ValidationResult};

/// Cleaned field -> value mapping
pub type Content = BTreeMap<String, Value>;

/// Clean `payload` against `model`.
///
/// A string `key` field is passed through as-is under `"key"`; handlers
/// never write it back to an entity.
pub fn clean(payload: &Payload, model: &dyn Model) -> ValidationResult<Content> {
    if !payload.is_keyed() {
        if let Payload::Json(doc) = payload {
            return Err(ValidationError::NotAnObject(json_type_name(doc)));
        }
    }

    let mut content = Content::new();

    let key = match payload.field("key") {
        Some(RawField::Json(JsonValue::String(key))) => Some(key.as_str()),
        Some(RawField::Text(key)) => Some(key),
        _ => None,
    };
    if let Some(key) = key {
        content.insert("key".to_string(), Value::String(key.to_string()));
    }

    for property in model.properties() {
        if let Some(raw) = payload.field(&property.name) {
            let value = clean_field(raw, property)?;
            content.insert(property.name.clone(), value);
        }
    }

    Ok(content)
}

/// Clean a single field.
fn clean_field(raw: RawField<'_>, property: &PropertyDef) -> ValidationResult<Value> {
    let field = property.name.as_str();

    let text = match raw {
        RawField::Json(JsonValue::Null) => return Ok(Value::Null),
        RawField::Json(JsonValue::String(s)) => s.as_str(),
        RawField::Text(s) => s,
        RawField::Json(other) => return clean_json_scalar(other, property),
    };

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    match &property.property_type {
        PropertyType::String | PropertyType::Text => Ok(Value::String(text.to_string())),
        PropertyType::Int => text
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ValidationError::invalid(field, format!("'{}' is not an integer", text))),
        PropertyType::Float => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| ValidationError::invalid(field, format!("'{}' is not a number", text))),
        PropertyType::Bool => parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| ValidationError::invalid(field, format!("'{}' is not a boolean", text))),
        PropertyType::DateTime => DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|e| ValidationError::invalid(field, format!("invalid RFC 3339 timestamp: {}", e))),
        PropertyType::Reference { target } => {
            let key = EntityKey::decode(text)
                .map_err(|_| ValidationError::invalid(field, "malformed key"))?;
            key.expect_kind(target).map_err(|_| {
                ValidationError::invalid(
                    field,
                    format!("key of kind '{}' where '{}' was expected", key.kind(), target),
                )
            })?;
            Ok(Value::Reference(key))
        }
    }
}

/// Clean a non-string, non-null JSON value.
fn clean_json_scalar(value: &JsonValue, property: &PropertyDef) -> ValidationResult<Value> {
    let field = property.name.as_str();
    let mismatch = || {
        ValidationError::type_mismatch(field, property.property_type.type_name(), json_type_name(value))
    };

    match (&property.property_type, value) {
        (PropertyType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(mismatch),
        (PropertyType::Float, JsonValue::Number(n)) => {
            n.as_f64().map(Value::Float).ok_or_else(mismatch)
        }
        (PropertyType::Bool, JsonValue::Bool(b)) => Ok(Value::Bool(*b)),
        _ => Err(mismatch()),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
