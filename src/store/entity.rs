//! Stored entity: a key plus named property values.

use std::collections::BTreeMap;

use super::key::EntityKey;
use super::value::Value;

static NULL: Value = Value::Null;

/// A persisted record
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    key: EntityKey,
    properties: BTreeMap<String, Value>,
}

impl Entity {
    /// Entity with no properties set
    pub fn new(key: EntityKey) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn key(&self) -> &EntityKey {
        &self.key
    }

    pub fn kind(&self) -> &str {
        self.key.kind()
    }

    /// Property value, `None` if the property was never set
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Property value, `Null` if the property was never set
    pub fn value(&self, name: &str) -> &Value {
        self.properties.get(name).unwrap_or(&NULL)
    }

    /// Referenced key, if the property holds one
    pub fn reference(&self, name: &str) -> Option<&EntityKey> {
        self.value(name).as_reference()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_property_reads_as_null() {
        let entity = Entity::new(EntityKey::root("Story", 1)).with("title", "Eat");
        assert_eq!(entity.value("title"), &Value::from("Eat"));
        assert_eq!(entity.value("number"), &Value::Null);
        assert!(entity.get("number").is_none());
    }

    #[test]
    fn test_reference_accessor() {
        let story = EntityKey::root("Story", 1);
        let entity = Entity::new(EntityKey::root("ScrumStory", 2)).with("story", story.clone());
        assert_eq!(entity.reference("story"), Some(&story));
        assert_eq!(entity.reference("status"), None);
    }
}
