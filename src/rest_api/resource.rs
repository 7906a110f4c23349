//! # Resources
//!
//! A resource is a handler configuration plus the set of operations a route
//! exposes. Collection routes usually enable list and create, instance
//! routes get, put and delete; any other combination is allowed.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use axum::http::Method;
use serde::{Deserialize, Serialize};

use super::config::HandlerConfig;

/// Set of enabled operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);
    pub const LIST: Capabilities = Capabilities(1 << 0);
    pub const CREATE: Capabilities = Capabilities(1 << 1);
    pub const GET: Capabilities = Capabilities(1 << 2);
    pub const PUT: Capabilities = Capabilities(1 << 3);
    pub const DELETE: Capabilities = Capabilities(1 << 4);

    /// List + create
    pub const COLLECTION: Capabilities = Capabilities(Self::LIST.0 | Self::CREATE.0);
    /// Get + put + delete
    pub const INSTANCE: Capabilities = Capabilities(Self::GET.0 | Self::PUT.0 | Self::DELETE.0);

    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Collection-side operations in the set
    pub fn collection_part(self) -> Capabilities {
        Capabilities(self.0 & Self::COLLECTION.0)
    }

    /// Instance-side operations in the set
    pub fn instance_part(self) -> Capabilities {
        Capabilities(self.0 & Self::INSTANCE.0)
    }

    /// HTTP methods served, for route tables
    pub fn methods(self) -> Vec<Method> {
        let mut methods = Vec::new();
        if self.contains(Self::LIST) || self.contains(Self::GET) {
            methods.push(Method::GET);
        }
        if self.contains(Self::CREATE) {
            methods.push(Method::POST);
        }
        if self.contains(Self::PUT) {
            methods.push(Method::PUT);
        }
        if self.contains(Self::DELETE) {
            methods.push(Method::DELETE);
        }
        methods
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Capabilities) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods: Vec<String> = self.methods().iter().map(Method::to_string).collect();
        write!(f, "{}", methods.join(","))
    }
}

/// Which side of a resource a route serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// `path` and `path/`
    Collection,
    /// `path/:key` and `path/:key/`
    Instance,
}

impl RouteKind {
    /// Default operations for this kind of route
    pub fn capabilities(self) -> Capabilities {
        match self {
            RouteKind::Collection => Capabilities::COLLECTION,
            RouteKind::Instance => Capabilities::INSTANCE,
        }
    }
}

/// Handler config + enabled operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub config: HandlerConfig,
    pub capabilities: Capabilities,
}

impl Resource {
    pub fn new(config: HandlerConfig, capabilities: Capabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    /// List + create
    pub fn collection(config: HandlerConfig) -> Self {
        Self::new(config, Capabilities::COLLECTION)
    }

    /// Get + put + delete
    pub fn instance(config: HandlerConfig) -> Self {
        Self::new(config, Capabilities::INSTANCE)
    }

    pub fn allows(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}
