//! # Handler Configuration
//!
//! Declarative per-route settings: which model a route serves, how list
//! queries are scoped and ordered, and which references are expanded.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Model, ModelDef, ModelRegistry};

use super::errors::{RestError, RestResult};

/// Per-route handler settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Kind of the entities served
    pub model: String,

    /// Ancestor kind; list and create are scoped under `:parent_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_model: Option<String>,

    /// Reference property that scopes list and create instead of ancestry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_property: Option<String>,

    /// Sort keys for list, ties broken left to right
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<String>,

    /// Reference properties inlined into responses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expanded_properties: Vec<String>,
}

impl HandlerConfig {
    /// Unscoped, unordered, unexpanded handler for `model`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn parent_model(mut self, kind: impl Into<String>) -> Self {
        self.parent_model = Some(kind.into());
        self
    }

    pub fn group_property(mut self, property: impl Into<String>) -> Self {
        self.group_property = Some(property.into());
        self
    }

    pub fn order_by<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn expanded_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expanded_properties = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether list and create need a `:parent_key` path segment
    pub fn is_scoped(&self) -> bool {
        self.parent_model.is_some() || self.group_property.is_some()
    }

    /// Check the configuration against the registered models.
    pub fn verify(&self, models: &ModelRegistry) -> RestResult<()> {
        let model = models.require(&self.model).map_err(|e| self.invalid(e))?;

        if let Some(parent) = &self.parent_model {
            models.require(parent).map_err(|e| self.invalid(e))?;
        }

        if self.parent_model.is_some() && self.group_property.is_some() {
            return Err(self.invalid("parent_model and group_property are mutually exclusive"));
        }

        if let Some(group) = &self.group_property {
            models.target_of(model, group).map_err(|e| self.invalid(e))?;
        }

        let mut expanded = HashSet::new();
        for name in &self.expanded_properties {
            models.target_of(model, name).map_err(|e| self.invalid(e))?;
            if !expanded.insert(name.as_str()) {
                return Err(self.invalid(format!("'{}' is expanded twice", name)));
            }
            if self.group_property.as_deref() == Some(name.as_str()) {
                return Err(self.invalid(format!("'{}' is both the group and an expansion", name)));
            }
        }

        for name in &self.order_by {
            if model.property(name).is_none() {
                return Err(self.invalid(format!("cannot order by undeclared property '{}'", name)));
            }
        }

        Ok(())
    }

    /// The served model
    pub(crate) fn resolve_model<'a>(&self, models: &'a ModelRegistry) -> RestResult<&'a ModelDef> {
        Ok(models.require(&self.model)?)
    }

    fn invalid(&self, reason: impl std::fmt::Display) -> RestError {
        RestError::Configuration(format!("handler for '{}': {}", self.model, reason))
    }
}
