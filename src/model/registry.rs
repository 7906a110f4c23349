//! Model registry
//!
//! Holds every known model by kind, so reference targets can be resolved to
//! their own definitions.

use std::collections::BTreeMap;

use super::errors::{ModelError, ModelResult};
use super::traits::Model;
use super::types::ModelDef;

/// Registry of model definitions indexed by kind.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelDef>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from definitions and verifies it.
    pub fn from_defs(defs: impl IntoIterator<Item = ModelDef>) -> ModelResult<Self> {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def)?;
        }
        registry.verify()?;
        Ok(registry)
    }

    /// Registers a model. Kinds are immutable once registered.
    pub fn register(&mut self, model: ModelDef) -> ModelResult<()> {
        model.validate_structure()?;

        if self.models.contains_key(&model.kind) {
            return Err(ModelError::DuplicateKind(model.kind));
        }

        self.models.insert(model.kind.clone(), model);
        Ok(())
    }

    /// Checks that every reference property targets a registered kind.
    ///
    /// Models may be registered in any order, so this runs once all of them
    /// are in.
    pub fn verify(&self) -> ModelResult<()> {
        for model in self.models.values() {
            for property in &model.properties {
                if let Some(target) = property.property_type.target() {
                    if !self.models.contains_key(target) {
                        return Err(ModelError::InvalidModel {
                            kind: model.kind.clone(),
                            reason: format!(
                                "property '{}' references unknown kind '{}'",
                                property.name, target
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Gets a model by kind.
    pub fn get(&self, kind: &str) -> Option<&ModelDef> {
        self.models.get(kind)
    }

    /// Gets a model by kind, failing with `UnknownKind`.
    pub fn require(&self, kind: &str) -> ModelResult<&ModelDef> {
        self.get(kind)
            .ok_or_else(|| ModelError::UnknownKind(kind.to_string()))
    }

    /// Resolves the model a reference property of `model` points at.
    pub fn target_of(&self, model: &dyn Model, property: &str) -> ModelResult<&ModelDef> {
        if model.property(property).is_none() {
            return Err(ModelError::UnknownProperty {
                kind: model.kind().to_string(),
                property: property.to_string(),
            });
        }

        let target = model
            .reference_target(property)
            .ok_or_else(|| ModelError::NotAReference {
                kind: model.kind().to_string(),
                property: property.to_string(),
            })?;

        self.require(target)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyDef;

    fn scrum_registry() -> ModelRegistry {
        ModelRegistry::from_defs(vec![
            ModelDef::new("ScrumStory")
                .with_property(PropertyDef::reference("story", "Story").required())
                .with_property(PropertyDef::string("status")),
            ModelDef::new("Story")
                .with_property(PropertyDef::int("number"))
                .with_property(PropertyDef::string("title").required()),
        ])
        .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = scrum_registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("Story").is_some());
        assert!(registry.get("Project").is_none());
        assert!(matches!(
            registry.require("Project"),
            Err(ModelError::UnknownKind(_))
        ));
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["ScrumStory", "Story"]);
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut registry = scrum_registry();
        let result = registry.register(ModelDef::new("Story"));
        assert!(matches!(result, Err(ModelError::DuplicateKind(_))));
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let result = ModelRegistry::from_defs(vec![ModelDef::new("ScrumStory")
            .with_property(PropertyDef::reference("story", "Story"))]);
        assert!(matches!(result, Err(ModelError::InvalidModel { .. })));
    }

    #[test]
    fn test_target_of() {
        let registry = scrum_registry();
        let scrum = registry.get("ScrumStory").unwrap();

        assert_eq!(registry.target_of(scrum, "story").unwrap().kind, "Story");
        assert!(matches!(
            registry.target_of(scrum, "status"),
            Err(ModelError::NotAReference { .. })
        ));
        assert!(matches!(
            registry.target_of(scrum, "owner"),
            Err(ModelError::UnknownProperty { .. })
        ));
    }
}
