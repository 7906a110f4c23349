//! # REST Router
//!
//! Mounts resources onto an axum router. A collection mount serves `path`
//! and `path/`; an instance mount serves `path/:key` and `path/:key/`.
//! Nested collections put a `:parent_key` segment inside `path`.
//!
//! Only the methods a resource's capability set names are routed; axum
//! answers every other method with 405.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::model::ModelRegistry;
use crate::parsers::{Payload, ParserRegistry};
use crate::store::EntityStore;

use super::config::HandlerConfig;
use super::errors::{RestError, RestResult};
use super::operations::{self, OperationContext};
use super::pipeline;
use super::resource::{Capabilities, Resource, RouteKind};

/// Path segment naming the parent or group entity
pub const PARENT_KEY_PARAM: &str = "parent_key";

/// Path segment naming the entity itself
pub const KEY_PARAM: &str = "key";

/// Shared router state
#[derive(Clone)]
pub struct RestState {
    pub store: Arc<dyn EntityStore>,
    pub models: Arc<ModelRegistry>,
    pub parsers: Arc<ParserRegistry>,
}

impl RestState {
    pub fn new(
        store: Arc<dyn EntityStore>,
        models: Arc<ModelRegistry>,
        parsers: Arc<ParserRegistry>,
    ) -> Self {
        Self {
            store,
            models,
            parsers,
        }
    }

    fn context<'a>(&'a self, config: &'a HandlerConfig) -> OperationContext<'a> {
        OperationContext::new(self.store.as_ref(), &self.models, config)
    }

    /// Decode a request body with the registered parsers
    fn parse(&self, headers: &HeaderMap, body: &[u8]) -> RestResult<Payload> {
        let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
        Ok(self.parsers.parse(content_type, body)?)
    }
}

/// One line of the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub path: String,
    pub model: String,
    pub capabilities: Capabilities,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let methods = self.capabilities.to_string();
        write!(f, "{:<16} {:<40} {}", methods, self.path, self.model)
    }
}

struct Mount {
    path: String,
    kind: RouteKind,
    resource: Resource,
}

impl Mount {
    /// Path the route is actually served at, without the trailing-slash twin
    fn served_path(&self) -> String {
        match self.kind {
            RouteKind::Collection => self.path.clone(),
            RouteKind::Instance => format!("{}/:{}", self.path, KEY_PARAM),
        }
    }

    fn capabilities(&self) -> Capabilities {
        match self.kind {
            RouteKind::Collection => self.resource.capabilities.collection_part(),
            RouteKind::Instance => self.resource.capabilities.instance_part(),
        }
    }
}

/// Builder for the generated REST routes
pub struct RestRouter {
    state: RestState,
    mounts: Vec<Mount>,
}

impl RestRouter {
    pub fn new(state: RestState) -> Self {
        Self {
            state,
            mounts: Vec::new(),
        }
    }

    /// Mount a resource at `path`: its collection operations on `path`, its
    /// instance operations on `path/:key`.
    pub fn resource(mut self, path: impl Into<String>, resource: Resource) -> Self {
        let path = path.into();
        for kind in [RouteKind::Collection, RouteKind::Instance] {
            let mount = Mount {
                path: path.clone(),
                kind,
                resource: resource.clone(),
            };
            if !mount.capabilities().is_empty() {
                self.mounts.push(mount);
            }
        }
        self
    }

    /// List + create on `path`
    pub fn collection(self, path: impl Into<String>, config: HandlerConfig) -> Self {
        self.resource(path, Resource::collection(config))
    }

    /// Get + put + delete on `path/:key`
    pub fn instance(self, path: impl Into<String>, config: HandlerConfig) -> Self {
        self.resource(path, Resource::instance(config))
    }

    /// Route table, in mount order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.mounts
            .iter()
            .map(|mount| RouteInfo {
                path: mount.served_path(),
                model: mount.resource.config.model.clone(),
                capabilities: mount.capabilities(),
            })
            .collect()
    }

    /// Check every mount without building anything.
    pub fn verify(&self) -> RestResult<()> {
        let mut served = HashSet::new();

        for mount in &self.mounts {
            let config = &mount.resource.config;
            config.verify(&self.state.models)?;

            let needs_parent = mount.kind == RouteKind::Collection && config.is_scoped();
            validate_path(&mount.path, needs_parent)?;

            for method in mount.capabilities().methods() {
                if !served.insert((mount.served_path(), method.clone())) {
                    return Err(RestError::Configuration(format!(
                        "{} {} is mounted twice",
                        method,
                        mount.served_path()
                    )));
                }
            }
        }

        let paths: Vec<String> = self.mounts.iter().map(Mount::served_path).collect();
        for (i, a) in paths.iter().enumerate() {
            for b in &paths[i + 1..] {
                if params_conflict(a, b) {
                    return Err(RestError::Configuration(format!(
                        "routes {} and {} name the same path segment differently",
                        a, b
                    )));
                }
            }
        }

        Ok(())
    }

    /// Verify and assemble the axum router.
    pub fn build(self) -> RestResult<Router> {
        self.verify()?;

        let mut router: Router<RestState> = Router::new();
        for mount in &self.mounts {
            let config = Arc::new(mount.resource.config.clone());
            let capabilities = mount.capabilities();
            let method_router = match mount.kind {
                RouteKind::Collection => collection_methods(config, capabilities),
                RouteKind::Instance => instance_methods(config, capabilities),
            };

            let path = mount.served_path();
            debug!(%path, %capabilities, model = %mount.resource.config.model, "mounting route");
            router = router
                .route(&path, method_router.clone())
                .route(&format!("{}/", path), method_router);
        }

        Ok(router
            .layer(TraceLayer::new_for_http())
            .with_state(self.state))
    }
}

/// Check that a mount path is one axum can serve.
///
/// Paths start with `/`, have no empty segments or trailing slash, and the
/// only parameter they may contain is `:parent_key`. `needs_parent` demands
/// that parameter.
pub fn validate_path(path: &str, needs_parent: bool) -> RestResult<()> {
    let invalid = |reason: &str| RestError::Configuration(format!("route '{}': {}", path, reason));

    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| invalid("must start with '/'"))?;
    if rest.is_empty() {
        return Err(invalid("must have at least one segment"));
    }

    let mut has_parent = false;
    for segment in rest.split('/') {
        if segment.is_empty() {
            return Err(invalid("empty segment or trailing '/'"));
        }
        if segment.starts_with('*') {
            return Err(invalid("wildcards are not supported"));
        }
        if let Some(param) = segment.strip_prefix(':') {
            if param != PARENT_KEY_PARAM || has_parent {
                return Err(invalid("the only parameter allowed is a single ':parent_key'"));
            }
            has_parent = true;
        }
    }

    if needs_parent && !has_parent {
        return Err(invalid("scoped handlers need a ':parent_key' segment"));
    }
    Ok(())
}

/// Whether two route paths put differently named parameters at the same
/// position behind a common prefix, which the router cannot disambiguate.
fn params_conflict(a: &str, b: &str) -> bool {
    for (x, y) in a.split('/').zip(b.split('/')) {
        match (x.strip_prefix(':'), y.strip_prefix(':')) {
            (Some(px), Some(py)) if px != py => return true,
            (Some(_), Some(_)) => continue,
            (None, None) if x == y => continue,
            _ => return false,
        }
    }
    false
}

// ==================
// Handlers
// ==================

type Params = Option<Path<HashMap<String, String>>>;

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .as_ref()
        .and_then(|Path(map)| map.get(name))
        .map(String::as_str)
}

fn require_key(params: &Params) -> RestResult<&str> {
    param(params, KEY_PARAM)
        .ok_or_else(|| RestError::Configuration("instance route has no :key segment".to_string()))
}

fn collection_methods(config: Arc<HandlerConfig>, capabilities: Capabilities) -> MethodRouter<RestState> {
    let mut methods = MethodRouter::new();

    if capabilities.contains(Capabilities::LIST) {
        let config = config.clone();
        methods = methods.get(move |State(state): State<RestState>, params: Params| async move {
            list_entities(&state, &config, &params)
        });
    }

    if capabilities.contains(Capabilities::CREATE) {
        methods = methods.post(
            move |State(state): State<RestState>, params: Params, headers: HeaderMap, body: Bytes| async move {
                create_entity(&state, &config, &params, &headers, &body)
            },
        );
    }

    methods
}

fn instance_methods(config: Arc<HandlerConfig>, capabilities: Capabilities) -> MethodRouter<RestState> {
    let mut methods = MethodRouter::new();

    if capabilities.contains(Capabilities::GET) {
        let config = config.clone();
        methods = methods.get(move |State(state): State<RestState>, params: Params| async move {
            get_entity(&state, &config, &params)
        });
    }

    if capabilities.contains(Capabilities::PUT) {
        let config = config.clone();
        methods = methods.put(
            move |State(state): State<RestState>, params: Params, headers: HeaderMap, body: Bytes| async move {
                put_entity(&state, &config, &params, &headers, &body)
            },
        );
    }

    if capabilities.contains(Capabilities::DELETE) {
        methods = methods.delete(move |State(state): State<RestState>, params: Params| async move {
            delete_entity(&state, &config, &params)
        });
    }

    methods
}

fn list_entities(state: &RestState, config: &HandlerConfig, params: &Params) -> RestResult<Response> {
    let ctx = state.context(config);
    pipeline::run(&Method::GET, || {
        operations::list(&ctx, param(params, PARENT_KEY_PARAM))
    })
}

fn create_entity(
    state: &RestState,
    config: &HandlerConfig,
    params: &Params,
    headers: &HeaderMap,
    body: &[u8],
) -> RestResult<Response> {
    let payload = state.parse(headers, body)?;
    let ctx = state.context(config);
    pipeline::run(&Method::POST, || {
        operations::create(&ctx, param(params, PARENT_KEY_PARAM), &payload)
    })
}

fn get_entity(state: &RestState, config: &HandlerConfig, params: &Params) -> RestResult<Response> {
    let key = require_key(params)?;
    let ctx = state.context(config);
    pipeline::run(&Method::GET, || operations::get(&ctx, key))
}

fn put_entity(
    state: &RestState,
    config: &HandlerConfig,
    params: &Params,
    headers: &HeaderMap,
    body: &[u8],
) -> RestResult<Response> {
    let key = require_key(params)?;
    let payload = state.parse(headers, body)?;
    let ctx = state.context(config);
    pipeline::run(&Method::PUT, || operations::put(&ctx, key, &payload))
}

fn delete_entity(state: &RestState, config: &HandlerConfig, params: &Params) -> RestResult<Response> {
    let key = require_key(params)?;
    let ctx = state.context(config);
    pipeline::run(&Method::DELETE, || operations::delete(&ctx, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelDef, PropertyDef};
    use crate::store::MemoryStore;

    fn state() -> RestState {
        let models = ModelRegistry::from_defs(vec![
            ModelDef::new("Project")
                .with_property(PropertyDef::int("number").required())
                .with_property(PropertyDef::string("name").required()),
            ModelDef::new("Story")
                .with_property(PropertyDef::int("number"))
                .with_property(PropertyDef::string("title").required()),
        ])
        .unwrap();
        RestState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(models),
            Arc::new(ParserRegistry::default()),
        )
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/projects", false).is_ok());
        assert!(validate_path("/projects/:parent_key/stories", true).is_ok());
        assert!(validate_path("/scrum/stories", false).is_ok());

        assert!(validate_path("projects", false).is_err());
        assert!(validate_path("/", false).is_err());
        assert!(validate_path("/projects/", false).is_err());
        assert!(validate_path("/projects//stories", false).is_err());
        assert!(validate_path("/projects/:id", false).is_err());
        assert!(validate_path("/projects/*rest", false).is_err());
        assert!(validate_path("/stories", true).is_err());
    }

    #[test]
    fn test_params_conflict() {
        assert!(params_conflict("/projects/:key", "/projects/:parent_key/stories"));
        assert!(!params_conflict("/projects", "/projects/:parent_key/stories"));
        assert!(!params_conflict("/projects/:key", "/stories/:key"));
        assert!(!params_conflict(
            "/projects/:parent_key/stories",
            "/projects/:parent_key/stories/:key"
        ));
    }

    #[test]
    fn test_route_table() {
        let router = RestRouter::new(state())
            .collection("/projects", HandlerConfig::new("Project"))
            .collection(
                "/projects/:parent_key/stories",
                HandlerConfig::new("Story").parent_model("Project"),
            )
            .resource(
                "/stories",
                Resource::new(HandlerConfig::new("Story"), Capabilities::LIST | Capabilities::GET),
            );

        let routes = router.routes();
        assert_eq!(routes.len(), 4);
        assert_eq!(routes[1].path, "/projects/:parent_key/stories");
        assert_eq!(routes[2].capabilities, Capabilities::LIST);
        assert_eq!(routes[3].path, "/stories/:key");
        assert_eq!(routes[3].capabilities, Capabilities::GET);
        assert!(router.verify().is_ok());
    }

    #[test]
    fn test_verify_rejects_bad_mounts() {
        let unscoped_nested = RestRouter::new(state())
            .collection("/stories", HandlerConfig::new("Story").parent_model("Project"));
        assert!(unscoped_nested.verify().is_err());

        let twice = RestRouter::new(state())
            .collection("/projects", HandlerConfig::new("Project"))
            .collection("/projects", HandlerConfig::new("Project"));
        assert!(twice.verify().is_err());

        let clashing = RestRouter::new(state())
            .instance("/projects", HandlerConfig::new("Project"))
            .collection(
                "/projects/:parent_key/stories",
                HandlerConfig::new("Story").parent_model("Project"),
            );
        assert!(clashing.verify().is_err());

        let unknown_model = RestRouter::new(state()).collection("/epics", HandlerConfig::new("Epic"));
        assert!(matches!(unknown_model.build(), Err(RestError::Configuration(_))));
    }
}
