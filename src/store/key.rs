//! # Entity Keys
//!
//! A key is the path from the root ancestor down to the entity itself, each
//! step being a `(kind, id)` pair. The string form is URL-safe base64 of
//! `Kind:id/Kind:id`, so it can be dropped straight into a route segment.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use super::errors::{StoreError, StoreResult};

/// One step of a key path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathElement {
    pub kind: String,
    pub id: u64,
}

impl PathElement {
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// Unique identity of a stored entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    /// Ancestors, root first
    ancestors: Vec<PathElement>,
    /// The entity's own step
    leaf: PathElement,
}

impl EntityKey {
    /// Key with no ancestors
    pub fn root(kind: impl Into<String>, id: u64) -> Self {
        Self {
            ancestors: Vec::new(),
            leaf: PathElement::new(kind, id),
        }
    }

    /// Key for an entity stored as a child of `self`
    pub fn child(&self, kind: impl Into<String>, id: u64) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(self.leaf.clone());
        Self {
            ancestors,
            leaf: PathElement::new(kind, id),
        }
    }

    pub fn kind(&self) -> &str {
        &self.leaf.kind
    }

    pub fn id(&self) -> u64 {
        self.leaf.id
    }

    /// Immediate parent, if any
    pub fn parent(&self) -> Option<EntityKey> {
        let mut ancestors = self.ancestors.clone();
        let leaf = ancestors.pop()?;
        Some(Self { ancestors, leaf })
    }

    /// Full path, root first
    pub fn path(&self) -> impl Iterator<Item = &PathElement> {
        self.ancestors.iter().chain(std::iter::once(&self.leaf))
    }

    /// True when `ancestor` is a strict prefix of this key's path.
    pub fn is_descendant_of(&self, ancestor: &EntityKey) -> bool {
        let depth = ancestor.ancestors.len() + 1;
        if self.ancestors.len() < depth {
            return false;
        }
        self.ancestors[..depth]
            .iter()
            .zip(ancestor.path())
            .all(|(a, b)| a == b)
    }

    /// Fails with `KindMismatch` unless the key names `kind`.
    pub fn expect_kind(&self, kind: &str) -> StoreResult<()> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(StoreError::KindMismatch {
                expected: kind.to_string(),
                actual: self.kind().to_string(),
            })
        }
    }

    /// Opaque, URL-safe string form
    pub fn encode(&self) -> String {
        let raw = self
            .path()
            .map(|e| format!("{}:{}", e.kind, e.id))
            .collect::<Vec<_>>()
            .join("/");
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    /// Parse the string produced by [`EntityKey::encode`].
    pub fn decode(encoded: &str) -> StoreResult<Self> {
        let bad = || StoreError::BadKey(encoded.to_string());

        let bytes = URL_SAFE_NO_PAD.decode(encoded.trim()).map_err(|_| bad())?;
        let raw = String::from_utf8(bytes).map_err(|_| bad())?;

        let mut elements = Vec::new();
        for step in raw.split('/') {
            let (kind, id) = step.split_once(':').ok_or_else(bad)?;
            if kind.is_empty() {
                return Err(bad());
            }
            let id: u64 = id.parse().map_err(|_| bad())?;
            if id == 0 {
                return Err(bad());
            }
            elements.push(PathElement::new(kind, id));
        }

        let leaf = elements.pop().ok_or_else(bad)?;
        Ok(Self {
            ancestors: elements,
            leaf,
        })
    }

    /// Path-wise ordering, used when references are sorted.
    pub fn path_cmp(&self, other: &EntityKey) -> Ordering {
        self.path()
            .map(|e| (e.kind.as_str(), e.id))
            .cmp(other.path().map(|e| (e.kind.as_str(), e.id)))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for EntityKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for EntityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for EntityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        EntityKey::decode(&encoded).map_err(de::Error::custom)
    }
}
