//! # Entity Store
//!
//! The storage contract the REST layer is written against, plus an in-memory
//! implementation used by the server binary and the tests.
//!
//! The layer above only ever needs five things from a store:
//! - get-by-key
//! - filtered, ordered queries over one kind
//! - put (insert or overwrite)
//! - delete
//! - fresh key allocation, optionally under a parent key
//!
//! There are no transactions. Every put and delete stands alone.

mod adapter;
mod entity;
mod errors;
mod key;
mod memory;
mod query;
mod value;

pub use adapter::EntityStore;
pub use entity::Entity;
pub use errors::{StoreError, StoreResult};
pub use key::{EntityKey, PathElement};
pub use memory::MemoryStore;
pub use query::{Filter, Query};
pub use value::Value;
