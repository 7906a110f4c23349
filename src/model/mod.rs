//! Entity type descriptors for serene
//!
//! A model describes one entity kind: its declared properties, which of them
//! are required, and which are references to other kinds. Handlers never look
//! at concrete Rust types; they work through the [`Model`] capability trait.
//!
//! # Design Principles
//!
//! - Property order is declaration order
//! - Reference targets are resolved through the [`ModelRegistry`]
//! - Required-ness is checked when an entity is built or updated, not when a
//!   payload is cleaned

mod errors;
mod registry;
mod traits;
mod types;

pub use errors::{ModelError, ModelResult};
pub use registry::ModelRegistry;
pub use traits::Model;
pub use types::{ModelDef, PropertyDef, PropertyType};
