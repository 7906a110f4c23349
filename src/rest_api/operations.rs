//! # CRUD Operations
//!
//! The five business operations behind every generated route. Each is an
//! independent function over an [`OperationContext`]; routes enable whichever
//! subset their capability set names.
//!
//! Create and put build and validate every entity before the first write.
//! The writes themselves are not atomic: sub-entities are stored before the
//! primary entity and are not rolled back if a later write fails.

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::flatten::represent;
use crate::model::{ModelDef, ModelRegistry};
use crate::parsers::Payload;
use crate::store::{Entity, EntityKey, EntityStore, Query, StoreError, Value};
use crate::validation::{clean, Content};

use super::config::HandlerConfig;
use super::errors::{RestError, RestResult};

/// Everything an operation needs
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    pub store: &'a dyn EntityStore,
    pub models: &'a ModelRegistry,
    pub config: &'a HandlerConfig,
}

/// Operation result before HTTP encoding
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Json(JsonValue),
    Empty,
}

impl Reply {
    /// JSON body; `Empty` encodes as `null`
    pub fn into_json(self) -> JsonValue {
        match self {
            Reply::Json(value) => value,
            Reply::Empty => JsonValue::Null,
        }
    }
}

impl<'a> OperationContext<'a> {
    pub fn new(store: &'a dyn EntityStore, models: &'a ModelRegistry, config: &'a HandlerConfig) -> Self {
        Self {
            store,
            models,
            config,
        }
    }

    fn model(&self) -> RestResult<&'a ModelDef> {
        self.config.resolve_model(self.models)
    }

    /// Model a reference property of the served model points at
    fn target(&self, property: &str) -> RestResult<&'a ModelDef> {
        let model = self.model()?;
        self.models
            .target_of(model, property)
            .map_err(|e| RestError::Configuration(e.to_string()))
    }

    /// Response body for an entity
    fn render(&self, entity: &Entity) -> RestResult<JsonValue> {
        Ok(represent(self.store, entity, &self.config.expanded_properties)?)
    }

    /// Group entity named by the path, for group-scoped routes
    fn group_key(&self, group: &str, parent_key: Option<&str>) -> RestResult<EntityKey> {
        let target = self.target(group)?;
        let group_entity = self.store.get_encoded(&target.kind, require_parent_key(parent_key)?)?;
        Ok(group_entity.key().clone())
    }

    /// Parent entity named by the path, for ancestor-scoped routes
    fn parent_key(&self, parent_model: &str, parent_key: Option<&str>) -> RestResult<EntityKey> {
        let parent = self.store.get_encoded(parent_model, require_parent_key(parent_key)?)?;
        Ok(parent.key().clone())
    }

    /// Payload cleaned against the target of every expanded property
    fn clean_expansions(&self, payload: &Payload) -> RestResult<Vec<(&'a str, &'a ModelDef, Content)>> {
        let mut cleaned = Vec::with_capacity(self.config.expanded_properties.len());
        for name in &self.config.expanded_properties {
            let target = self.target(name)?;
            cleaned.push((name.as_str(), target, clean(payload, target)?));
        }
        Ok(cleaned)
    }

    /// Sub-entity behind an expanded property of `entity`
    fn expanded_key<'e>(&self, entity: &'e Entity, property: &str) -> RestResult<&'e EntityKey> {
        entity.reference(property).ok_or_else(|| {
            RestError::MissingExpansion(format!(
                "'{}' of {} holds no reference",
                property,
                entity.key()
            ))
        })
    }
}

fn require_parent_key(parent_key: Option<&str>) -> RestResult<&str> {
    parent_key.ok_or_else(|| {
        RestError::Configuration("scoped route has no :parent_key path segment".to_string())
    })
}

/// Copy cleaned fields onto an entity. `key` is never written.
fn apply(entity: &mut Entity, content: Content) {
    for (name, value) in content {
        if name != "key" {
            entity.set(name, value);
        }
    }
}

// ==================
// Collection operations
// ==================

/// List entities, scoped by group or parent, ordered by `order_by`.
pub fn list(ctx: &OperationContext<'_>, parent_key: Option<&str>) -> RestResult<Reply> {
    let model = ctx.model()?;
    let mut query = Query::new(model.kind.as_str()).order_by(ctx.config.order_by.iter().cloned());

    if let Some(group) = &ctx.config.group_property {
        let group_key = ctx.group_key(group, parent_key)?;
        query = query.property_eq(group.as_str(), group_key);
    } else if let Some(parent_model) = &ctx.config.parent_model {
        query = query.ancestor(ctx.parent_key(parent_model, parent_key)?);
    }

    let entities = ctx.store.query(&query)?;
    debug!(kind = %model.kind, count = entities.len(), "list");

    let items = entities
        .iter()
        .map(|entity| ctx.render(entity))
        .collect::<RestResult<Vec<_>>>()?;
    Ok(Reply::Json(JsonValue::Array(items)))
}

/// Create an entity, and one sub-entity per expanded property from the
/// same payload.
pub fn create(
    ctx: &OperationContext<'_>,
    parent_key: Option<&str>,
    payload: &Payload,
) -> RestResult<Reply> {
    let model = ctx.model()?;
    let mut content = clean(payload, model)?;
    let expansions = ctx.clean_expansions(payload)?;

    let parent = match &ctx.config.parent_model {
        Some(parent_model) => Some(ctx.parent_key(parent_model, parent_key)?),
        None => None,
    };

    if let Some(group) = &ctx.config.group_property {
        let group_key = ctx.group_key(group, parent_key)?;
        content.insert(group.clone(), Value::Reference(group_key));
    }

    let mut sub_entities = Vec::with_capacity(expansions.len());
    for (name, target, sub_content) in expansions {
        let key = ctx.store.allocate_key(&target.kind, None)?;
        let sub_entity = target.instantiate(key, &sub_content)?;
        content.insert(name.to_string(), Value::Reference(sub_entity.key().clone()));
        sub_entities.push(sub_entity);
    }

    let key = ctx.store.allocate_key(&model.kind, parent.as_ref())?;
    let entity = model.instantiate(key, &content)?;

    for sub_entity in &sub_entities {
        ctx.store.put(sub_entity)?;
        debug!(kind = %sub_entity.kind(), key = %sub_entity.key(), "created expanded entity");
    }
    ctx.store.put(&entity)?;
    info!(kind = %model.kind, key = %entity.key(), "created");

    Ok(Reply::Json(ctx.render(&entity)?))
}

// ==================
// Instance operations
// ==================

/// Fetch one entity by its encoded key.
pub fn get(ctx: &OperationContext<'_>, key: &str) -> RestResult<Reply> {
    let model = ctx.model()?;
    let entity = ctx.store.get_encoded(&model.kind, key)?;
    debug!(kind = %model.kind, key = %entity.key(), "get");
    Ok(Reply::Json(ctx.render(&entity)?))
}

/// Update an entity and its expanded sub-entities from one payload.
///
/// Only fields present in the payload change. Expanded references stay
/// pinned to the sub-entities they already point at.
pub fn put(ctx: &OperationContext<'_>, key: &str, payload: &Payload) -> RestResult<Reply> {
    let model = ctx.model()?;
    let mut entity = ctx.store.get_encoded(&model.kind, key)?;
    let mut content = clean(payload, model)?;
    let expansions = ctx.clean_expansions(payload)?;

    let mut sub_entities = Vec::with_capacity(expansions.len());
    for (name, target, sub_content) in expansions {
        let sub_key = ctx.expanded_key(&entity, name)?;
        let mut sub_entity = ctx.store.get(sub_key).map_err(|e| match e {
            StoreError::NotFound(missing) => {
                RestError::MissingExpansion(format!("'{}' references missing entity {}", name, missing))
            }
            other => other.into(),
        })?;

        apply(&mut sub_entity, sub_content);
        target.validate_entity(&sub_entity)?;

        // The body never re-points an expanded reference.
        content.insert(name.to_string(), Value::Reference(sub_entity.key().clone()));
        sub_entities.push(sub_entity);
    }

    apply(&mut entity, content);
    model.validate_entity(&entity)?;

    for sub_entity in &sub_entities {
        ctx.store.put(sub_entity)?;
        debug!(kind = %sub_entity.kind(), key = %sub_entity.key(), "updated expanded entity");
    }
    ctx.store.put(&entity)?;
    debug!(kind = %model.kind, key = %entity.key(), "updated");

    Ok(Reply::Json(ctx.render(&entity)?))
}

/// Delete an entity and its expanded sub-entities. Plain references are
/// left alone; sub-entities that are already gone are skipped.
pub fn delete(ctx: &OperationContext<'_>, key: &str) -> RestResult<Reply> {
    let model = ctx.model()?;
    let entity = ctx.store.get_encoded(&model.kind, key)?;

    for name in &ctx.config.expanded_properties {
        let sub_key = ctx.expanded_key(&entity, name)?;
        match ctx.store.delete(sub_key) {
            Ok(()) => debug!(key = %sub_key, "deleted expanded entity"),
            Err(StoreError::NotFound(_)) => debug!(key = %sub_key, "expanded entity already gone"),
            Err(e) => return Err(e.into()),
        }
    }

    ctx.store.delete(entity.key())?;
    info!(kind = %model.kind, key = %entity.key(), "deleted");

    Ok(Reply::Empty)
}
