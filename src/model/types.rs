//! Model type definitions
//!
//! Supported property types:
//! - string: short UTF-8 string
//! - text: long UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - datetime: UTC timestamp
//! - reference: key of an entity of a fixed target kind

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityKey, Value};

use super::errors::{ModelError, ModelResult};
use super::traits::Model;

/// Property types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Text,
    Int,
    Float,
    Bool,
    #[serde(rename = "datetime")]
    DateTime,
    /// Reference to an entity of kind `target`
    Reference { target: String },
}

impl PropertyType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Text => "text",
            PropertyType::Int => "int",
            PropertyType::Float => "float",
            PropertyType::Bool => "bool",
            PropertyType::DateTime => "datetime",
            PropertyType::Reference { .. } => "reference",
        }
    }

    /// Target kind for references
    pub fn target(&self) -> Option<&str> {
        match self {
            PropertyType::Reference { target } => Some(target),
            _ => None,
        }
    }
}

/// A declared property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(flatten)]
    pub property_type: PropertyType,
    /// Whether the property must be non-null
    #[serde(default)]
    pub required: bool,
}

impl PropertyDef {
    /// Optional property of the given type
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            required: false,
        }
    }

    /// Mark the property as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::String)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Text)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Float)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Bool)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::DateTime)
    }

    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyType::Reference {
                target: target.into(),
            },
        )
    }
}

/// An entity kind and its declared properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDef {
    pub kind: String,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

impl ModelDef {
    /// Create a model with no properties
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Vec::new(),
        }
    }

    /// Builder-style property declaration
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Validates the model definition itself (not an entity).
    ///
    /// Kind names end up inside entity keys, so they are restricted to
    /// ASCII letters, digits and underscores. `key` is reserved for the
    /// entity's own key in serialized form.
    pub fn validate_structure(&self) -> ModelResult<()> {
        let invalid = |reason: String| ModelError::InvalidModel {
            kind: self.kind.clone(),
            reason,
        };

        if self.kind.is_empty()
            || !self
                .kind
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(invalid("kind must be non-empty [A-Za-z0-9_]".to_string()));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(invalid("property names must be non-empty".to_string()));
            }
            if property.name == "key" {
                return Err(invalid("'key' is reserved".to_string()));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(invalid(format!("property '{}' declared twice", property.name)));
            }
        }

        Ok(())
    }

    /// Build an entity of this kind under `key`.
    ///
    /// Every declared property is present on the result; the ones missing
    /// from `content` are null. A `key` entry in `content` is ignored.
    pub fn instantiate(
        &self,
        key: EntityKey,
        content: &BTreeMap<String, Value>,
    ) -> ModelResult<Entity> {
        if key.kind() != self.kind {
            return Err(ModelError::KindMismatch {
                expected: self.kind.clone(),
                actual: key.kind().to_string(),
            });
        }

        for name in content.keys() {
            if name != "key" && self.property(name).is_none() {
                return Err(ModelError::UnknownProperty {
                    kind: self.kind.clone(),
                    property: name.clone(),
                });
            }
        }

        let mut entity = Entity::new(key);
        for property in &self.properties {
            let value = content.get(&property.name).cloned().unwrap_or(Value::Null);
            entity.set(property.name.clone(), value);
        }

        self.validate_entity(&entity)?;
        Ok(entity)
    }

    /// Check required properties and reference targets on an entity.
    pub fn validate_entity(&self, entity: &Entity) -> ModelResult<()> {
        for property in &self.properties {
            let value = entity.value(&property.name);

            if value.is_null() {
                if property.required {
                    return Err(ModelError::MissingRequired {
                        kind: self.kind.clone(),
                        property: property.name.clone(),
                    });
                }
                continue;
            }

            if let (Some(target), Some(referenced)) =
                (property.property_type.target(), value.as_reference())
            {
                if referenced.kind() != target {
                    return Err(ModelError::WrongTarget {
                        property: property.name.clone(),
                        expected: target.to_string(),
                        actual: referenced.kind().to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Model for ModelDef {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }
}
