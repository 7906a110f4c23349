//! # HTTP Server
//!
//! Assembles the generated REST routes from a [`ServerConfig`], wraps them
//! in CORS, and serves them with tokio.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::parsers::ParserRegistry;
use crate::rest_api::{Resource, RestResult, RestRouter, RestState, RouteInfo};
use crate::store::EntityStore;

use super::config::ServerConfig;

/// HTTP server for the generated REST API
pub struct HttpServer {
    config: ServerConfig,
    routes: Vec<RouteInfo>,
    router: Router,
}

impl HttpServer {
    /// Verify `config` and build its routes over `store` with the default
    /// parsers.
    pub fn new(config: ServerConfig, store: Arc<dyn EntityStore>) -> RestResult<Self> {
        Self::with_parsers(config, store, ParserRegistry::default())
    }

    /// Same as [`HttpServer::new`] with a custom parser registry
    pub fn with_parsers(
        config: ServerConfig,
        store: Arc<dyn EntityStore>,
        parsers: ParserRegistry,
    ) -> RestResult<Self> {
        let models = config.verify()?;
        let state = RestState::new(store, Arc::new(models), Arc::new(parsers));

        let rest = Self::rest_router(&config, state);
        let routes = rest.routes();
        let router = rest.build()?.layer(Self::cors(&config));

        Ok(Self {
            config,
            routes,
            router,
        })
    }

    /// Mount every configured route
    pub fn rest_router(config: &ServerConfig, state: RestState) -> RestRouter {
        config.routes.iter().fold(RestRouter::new(state), |router, route| {
            router.resource(
                route.path.clone(),
                Resource::new(route.handler.clone(), route.kind.capabilities()),
            )
        })
    }

    fn cors(config: &ServerConfig) -> CorsLayer {
        if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Mounted routes
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        for route in &self.routes {
            info!(methods = %route.capabilities, path = %route.path, model = %route.model, "route");
        }

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "serving REST API");
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
