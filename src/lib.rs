//! serene - generic REST handlers over an entity store
//!
//! Given model definitions and a route table, derives list, create, get,
//! put and delete endpoints that map entities to flat JSON, scope lists by
//! parent or group, and inline ("expand") referenced entities.
//!
//! Layers, leaf first:
//! - [`store`]: entity store contract and an in-memory implementation
//! - [`model`]: entity kinds and their declared properties
//! - [`parsers`]: request body decoding by content type
//! - [`validation`]: payload cleaning against a model
//! - [`flatten`]: entity to JSON record conversion, with expansion
//! - [`rest_api`]: CRUD operations, response pipeline, axum routes
//! - [`http_server`]: configuration file and serve loop
//! - [`cli`]: the `serene` command

pub mod cli;
pub mod flatten;
pub mod http_server;
pub mod model;
pub mod parsers;
pub mod rest_api;
pub mod store;
pub mod validation;
