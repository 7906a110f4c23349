//! # HTTP Server Module
//!
//! Turns a JSON server configuration into a running axum server.
//!
//! # Configuration
//!
//! - `host`, `port` - bind address (default `0.0.0.0:8080`)
//! - `cors_origins` - allowed origins, empty for any
//! - `models` - entity kinds and their properties
//! - `routes` - `{path, kind, handler}` entries, see [`RouteDef`]

pub mod config;
pub mod server;

pub use config::{RouteDef, ServerConfig};
pub use server::HttpServer;
