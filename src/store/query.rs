//! # Store Queries
//!
//! A query selects entities of one kind, optionally narrowed by a single
//! filter, and orders them by zero or more properties.

use super::entity::Entity;
use super::key::EntityKey;
use super::value::Value;

/// Query filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Entities stored (at any depth) under the given key
    Ancestor(EntityKey),

    /// Entities whose property equals the value
    PropertyEq { name: String, value: Value },
}

impl Filter {
    /// Check if an entity matches this filter
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            Filter::Ancestor(ancestor) => entity.key().is_descendant_of(ancestor),
            Filter::PropertyEq { name, value } => entity.value(name) == value,
        }
    }
}

/// A query over one entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: String,
    pub filter: Option<Filter>,
    /// Ascending sort keys, left to right
    pub order_by: Vec<String>,
}

impl Query {
    /// Unfiltered, unordered query over `kind`
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            filter: None,
            order_by: Vec::new(),
        }
    }

    /// Restrict to descendants of `ancestor`
    pub fn ancestor(mut self, ancestor: EntityKey) -> Self {
        self.filter = Some(Filter::Ancestor(ancestor));
        self
    }

    /// Restrict to entities whose `name` equals `value`
    pub fn property_eq(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::PropertyEq {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Sort by the given properties
    pub fn order_by<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = names.into_iter().map(Into::into).collect();
        self
    }

    /// Check if an entity is selected by this query
    pub fn matches(&self, entity: &Entity) -> bool {
        entity.kind() == self.kind && self.filter.as_ref().map_or(true, |f| f.matches(entity))
    }

    /// Apply the ordering in place.
    ///
    /// The sort is stable: entities equal on every sort key keep the order
    /// they came in, which for a store scan is creation order.
    pub fn sort(&self, entities: &mut [Entity]) {
        if self.order_by.is_empty() {
            return;
        }

        entities.sort_by(|a, b| {
            for name in &self.order_by {
                let cmp = a.value(name).order_cmp(b.value(name));
                if cmp != std::cmp::Ordering::Equal {
                    return cmp;
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: u64, number: i64, name: &str) -> Entity {
        Entity::new(EntityKey::root("Project", id))
            .with("number", number)
            .with("name", name)
    }

    fn names(entities: &[Entity]) -> Vec<String> {
        entities
            .iter()
            .map(|e| match e.value("name") {
                Value::String(s) => s.clone(),
                other => panic!("unexpected name {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_multi_key_sort_is_stable() {
        let mut entities = vec![
            project(1, 2, "Dewberry"),
            project(2, 1, "Coconut"),
            project(3, 1, "Apple"),
            project(4, 2, "Banana"),
        ];

        Query::new("Project").order_by(["number"]).sort(&mut entities);
        assert_eq!(names(&entities), ["Coconut", "Apple", "Dewberry", "Banana"]);

        Query::new("Project").order_by(["number", "name"]).sort(&mut entities);
        assert_eq!(names(&entities), ["Apple", "Coconut", "Banana", "Dewberry"]);
    }

    #[test]
    fn test_ancestor_filter() {
        let parent = EntityKey::root("Project", 1);
        let child = Entity::new(parent.child("Story", 2));
        let stranger = Entity::new(EntityKey::root("Story", 3));

        let query = Query::new("Story").ancestor(parent);
        assert!(query.matches(&child));
        assert!(!query.matches(&stranger));
    }

    #[test]
    fn test_property_filter_and_kind() {
        let group = EntityKey::root("Project", 1);
        let member = Entity::new(EntityKey::root("Story", 2)).with("project", group.clone());
        let other_kind = Entity::new(EntityKey::root("Task", 3)).with("project", group.clone());

        let query = Query::new("Story").property_eq("project", group);
        assert!(query.matches(&member));
        assert!(!query.matches(&other_kind));
    }
}
