//! # Flatten / Expand
//!
//! Converts entities into flat JSON records.
//!
//! `to_dict` gives the entity's `key` plus every property. `flatten_to_dict`
//! additionally inlines ("expands") selected reference properties: the
//! reference itself disappears and the referenced entity's fields are merged
//! into the record.
//!
//! Merge precedence, lowest to highest:
//! 1. the last-declared expanded entity
//! 2. ... up to the first-declared expanded entity
//! 3. the primary entity's own remaining fields, `key` included

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::store::{Entity, EntityStore, StoreError, Value};

/// A flattened entity
pub type Record = serde_json::Map<String, JsonValue>;

/// Result type for flattening
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Flattening errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// Expanded property is null or unset
    #[error("Expanded property '{property}' holds no reference")]
    MissingExpansion { property: String },

    /// Expanded property points at an entity that no longer exists
    #[error("Expanded property '{property}' references missing entity {key}")]
    DanglingReference { property: String, key: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Flatten an entity into `key` + one entry per property.
///
/// With `recursive` unset, references are written as their key string. With
/// it set, each referenced entity is fetched and flattened (one level deep,
/// its own references stay as keys).
pub fn to_dict(store: &dyn EntityStore, entity: &Entity, recursive: bool) -> FlattenResult<Record> {
    let mut record = Record::new();
    record.insert("key".to_string(), JsonValue::String(entity.key().encode()));

    for (name, value) in entity.properties() {
        let json = match value {
            Value::Reference(key) if recursive => {
                let referenced = store.get(key)?;
                JsonValue::Object(to_dict(store, &referenced, false)?)
            }
            other => other.to_json(),
        };
        record.insert(name.to_string(), json);
    }

    Ok(record)
}

/// Flatten an entity, inlining the referenced entities named in `expanded`.
///
/// Expanded properties are processed in reverse declaration order and the
/// primary entity's own fields are merged last, so on a name collision the
/// primary entity wins, then the earliest-declared expansion.
pub fn flatten_to_dict(
    store: &dyn EntityStore,
    entity: &Entity,
    expanded: &[String],
) -> FlattenResult<Record> {
    let mut own = to_dict(store, entity, false)?;
    let mut flattened = Record::new();

    for property in expanded.iter().rev() {
        own.remove(property);

        let key = entity
            .reference(property)
            .ok_or_else(|| FlattenError::MissingExpansion {
                property: property.clone(),
            })?;

        let referenced = store.get(key).map_err(|e| match e {
            StoreError::NotFound(key) => FlattenError::DanglingReference {
                property: property.clone(),
                key,
            },
            other => FlattenError::Store(other),
        })?;

        flattened.extend(to_dict(store, &referenced, false)?);
    }

    flattened.extend(own);
    Ok(flattened)
}

/// Response representation of an entity: plain `to_dict` without
/// expansions, `flatten_to_dict` with them.
pub fn represent(
    store: &dyn EntityStore,
    entity: &Entity,
    expanded: &[String],
) -> FlattenResult<JsonValue> {
    let record = if expanded.is_empty() {
        to_dict(store, entity, false)?
    } else {
        flatten_to_dict(store, entity, expanded)?
    };
    Ok(JsonValue::Object(record))
}
