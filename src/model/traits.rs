//! The capability interface handlers use to inspect an entity type.

use super::types::PropertyDef;

/// An entity type with declared properties, some of which are references
pub trait Model: Send + Sync {
    /// Kind name, as used in entity keys
    fn kind(&self) -> &str;

    /// Declared properties, in declaration order
    fn properties(&self) -> &[PropertyDef];

    fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties().iter().find(|p| p.name == name)
    }

    fn property_names(&self) -> Vec<&str> {
        self.properties().iter().map(|p| p.name.as_str()).collect()
    }

    /// Target kind of a reference property; `None` for scalars and
    /// undeclared names.
    fn reference_target(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|p| p.property_type.target())
    }

    fn is_reference(&self, name: &str) -> bool {
        self.reference_target(name).is_some()
    }
}
