//! # In-Memory Store
//!
//! `EntityStore` backed by a lock-guarded table. Entities are kept in
//! creation order; overwriting an entity does not move it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::adapter::EntityStore;
use super::entity::Entity;
use super::errors::{StoreError, StoreResult};
use super::key::EntityKey;
use super::query::Query;

/// In-memory entity store
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    /// Last allocated id
    last_id: u64,
    /// Last creation sequence number
    last_seq: u64,
    /// Creation sequence -> entity
    rows: BTreeMap<u64, Entity>,
    /// Key -> creation sequence
    index: HashMap<EntityKey, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Table>> {
        self.table
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Table>> {
        self.table
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }
}

impl EntityStore for MemoryStore {
    fn allocate_key(&self, kind: &str, parent: Option<&EntityKey>) -> StoreResult<EntityKey> {
        let mut table = self.write()?;
        table.last_id += 1;
        let id = table.last_id;

        Ok(match parent {
            Some(parent) => parent.child(kind, id),
            None => EntityKey::root(kind, id),
        })
    }

    fn get(&self, key: &EntityKey) -> StoreResult<Entity> {
        let table = self.read()?;
        table
            .index
            .get(key)
            .and_then(|seq| table.rows.get(seq))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.encode()))
    }

    fn query(&self, query: &Query) -> StoreResult<Vec<Entity>> {
        let table = self.read()?;
        let mut entities: Vec<Entity> = table
            .rows
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        query.sort(&mut entities);
        Ok(entities)
    }

    fn put(&self, entity: &Entity) -> StoreResult<()> {
        let mut table = self.write()?;
        let existing = table.index.get(entity.key()).copied();
        let seq = match existing {
            Some(seq) => seq,
            None => {
                table.last_seq += 1;
                let seq = table.last_seq;
                table.index.insert(entity.key().clone(), seq);
                seq
            }
        };
        table.rows.insert(seq, entity.clone());
        Ok(())
    }

    fn delete(&self, key: &EntityKey) -> StoreResult<()> {
        let mut table = self.write()?;
        let seq = table
            .index
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.encode()))?;
        table.rows.remove(&seq);
        Ok(())
    }

    fn count(&self, kind: &str) -> StoreResult<usize> {
        let table = self.read()?;
        Ok(table.rows.values().filter(|e| e.kind() == kind).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Value;

    fn put_project(store: &MemoryStore, number: i64, name: &str) -> EntityKey {
        let key = store.allocate_key("Project", None).unwrap();
        let entity = Entity::new(key.clone())
            .with("number", number)
            .with("name", name);
        store.put(&entity).unwrap();
        key
    }

    #[test]
    fn test_put_and_get() {
        let store = MemoryStore::new();
        let key = put_project(&store, 1, "Apple");

        let fetched = store.get(&key).unwrap();
        assert_eq!(fetched.value("name"), &Value::from("Apple"));
        assert_eq!(store.count("Project").unwrap(), 1);
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        let result = store.get(&EntityKey::root("Project", 42));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_unordered_query_keeps_creation_order() {
        let store = MemoryStore::new();
        let dewberry = put_project(&store, 2, "Dewberry");
        let coconut = put_project(&store, 1, "Coconut");
        let apple = put_project(&store, 1, "Apple");

        let keys: Vec<EntityKey> = store
            .query(&Query::new("Project"))
            .unwrap()
            .into_iter()
            .map(|e| e.key().clone())
            .collect();
        assert_eq!(keys, vec![dewberry, coconut, apple]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let store = MemoryStore::new();
        let first = put_project(&store, 1, "Apple");
        let second = put_project(&store, 2, "Banana");

        let mut entity = store.get(&first).unwrap();
        entity.set("name", "Apricot");
        store.put(&entity).unwrap();

        let all = store.query(&Query::new("Project")).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].key(), &first);
        assert_eq!(all[0].value("name"), &Value::from("Apricot"));
        assert_eq!(all[1].key(), &second);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        let key = put_project(&store, 1, "Apple");

        store.delete(&key).unwrap();
        assert_eq!(store.count("Project").unwrap(), 0);
        assert!(matches!(store.delete(&key), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_child_keys_and_encoded_lookup() {
        let store = MemoryStore::new();
        let project = put_project(&store, 1, "Apple");
        let story_key = store.allocate_key("Story", Some(&project)).unwrap();
        store.put(&Entity::new(story_key.clone())).unwrap();

        assert_eq!(story_key.parent(), Some(project.clone()));
        assert!(store.get_encoded("Story", &story_key.encode()).is_ok());
        assert!(matches!(
            store.get_encoded("Project", &story_key.encode()),
            Err(StoreError::KindMismatch { .. })
        ));
        assert!(matches!(
            store.get_encoded("Story", "not-a-key"),
            Err(StoreError::BadKey(_))
        ));
    }
}
