//! # Store Contract
//!
//! The trait the REST layer calls into. Any backend that can satisfy these
//! operations can sit underneath the generic handlers.

use super::entity::Entity;
use super::errors::StoreResult;
use super::key::EntityKey;
use super::query::Query;

/// Entity store operations
pub trait EntityStore: Send + Sync {
    /// Allocate a fresh key of `kind`, as a child of `parent` when given.
    fn allocate_key(&self, kind: &str, parent: Option<&EntityKey>) -> StoreResult<EntityKey>;

    /// Fetch an entity by key
    fn get(&self, key: &EntityKey) -> StoreResult<Entity>;

    /// Run a query. Unordered queries return creation order.
    fn query(&self, query: &Query) -> StoreResult<Vec<Entity>>;

    /// Insert or overwrite an entity
    fn put(&self, entity: &Entity) -> StoreResult<()>;

    /// Remove an entity
    fn delete(&self, key: &EntityKey) -> StoreResult<()>;

    /// Number of stored entities of `kind`
    fn count(&self, kind: &str) -> StoreResult<usize>;

    /// Decode `encoded` and fetch it, insisting the key is of `kind`.
    fn get_encoded(&self, kind: &str, encoded: &str) -> StoreResult<Entity> {
        let key = EntityKey::decode(encoded)?;
        key.expect_kind(kind)?;
        self.get(&key)
    }
}
