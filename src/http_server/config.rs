//! HTTP Server Configuration
//!
//! Everything a server needs, loaded from one JSON file: bind address, CORS
//! origins, the model definitions and the route table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{ModelDef, ModelRegistry};
use crate::rest_api::{validate_path, HandlerConfig, RestError, RestResult, RouteKind};

/// One entry of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDef {
    /// Collection path; instance routes append `/:key`
    pub path: String,

    /// Collection (list + create) or instance (get + put + delete)
    pub kind: RouteKind,

    pub handler: HandlerConfig,
}

impl RouteDef {
    pub fn new(path: impl Into<String>, kind: RouteKind, handler: HandlerConfig) -> Self {
        Self {
            path: path.into(),
            kind,
            handler,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Entity kinds
    #[serde(default)]
    pub models: Vec<ModelDef>,

    /// Generated routes
    #[serde(default)]
    pub routes: Vec<RouteDef>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            models: Vec::new(),
            routes: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> RestResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            RestError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a JSON config document
    pub fn from_json(raw: &str) -> RestResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| RestError::Configuration(format!("invalid server config: {}", e)))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the model registry from `models`
    pub fn registry(&self) -> RestResult<ModelRegistry> {
        ModelRegistry::from_defs(self.models.iter().cloned())
            .map_err(|e| RestError::Configuration(e.to_string()))
    }

    /// Check models, handler configs and route paths.
    pub fn verify(&self) -> RestResult<ModelRegistry> {
        let models = self.registry()?;

        for route in &self.routes {
            route.handler.verify(&models)?;
            let needs_parent = route.kind == RouteKind::Collection && route.handler.is_scoped();
            validate_path(&route.path, needs_parent)?;
        }

        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.cors_origins.is_empty());
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(9000);
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_parse_and_verify() {
        let config = ServerConfig::from_json(
            r#"{
                "port": 3000,
                "models": [
                    {"kind": "Project", "properties": [
                        {"name": "number", "type": "int", "required": true},
                        {"name": "name", "type": "string", "required": true}
                    ]},
                    {"kind": "Story", "properties": [
                        {"name": "number", "type": "int"},
                        {"name": "title", "type": "string", "required": true}
                    ]}
                ],
                "routes": [
                    {"path": "/projects", "kind": "collection",
                     "handler": {"model": "Project", "order_by": ["number"]}},
                    {"path": "/projects/:parent_key/stories", "kind": "collection",
                     "handler": {"model": "Story", "parent_model": "Project"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[1].kind, RouteKind::Collection);

        let models = config.verify().unwrap();
        assert_eq!(models.len(), 2);
    }

    #[test]
    fn test_verify_rejects_unscoped_nested_path() {
        let mut config = ServerConfig::default();
        config.models.push(ModelDef::new("Story"));
        config.models.push(ModelDef::new("Project"));
        config.routes.push(RouteDef::new(
            "/stories",
            RouteKind::Collection,
            HandlerConfig::new("Story").parent_model("Project"),
        ));
        assert!(matches!(config.verify(), Err(RestError::Configuration(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(ServerConfig::from_json("{not json").is_err());
        assert!(ServerConfig::from_json(r#"{"routes": [{"path": "/x"}]}"#).is_err());
    }
}
