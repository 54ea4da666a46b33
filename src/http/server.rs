//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router serving the document root
//! - Wire up middleware (tracing, header injection, request log, cookie check)
//! - Load TLS material and bind the listener
//!
//! Layer order, outermost first:
//!
//! ```text
//! TraceLayer → inject_headers → log_request → access_control → serve_static
//! ```
//!
//! Header injection wraps the cookie check, so a 401 carries the same
//! cache and CORS headers as any other response.

use std::sync::Arc;

use axum::{middleware, Router};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::http::request::log_request;
use crate::http::response::inject_headers;
use crate::http::static_files::{serve_static, StaticFiles};
use crate::net::{load_tls_config, Listener};
use crate::security::access_control_middleware;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub files: StaticFiles,
}

/// HTTPS static-file server.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            files: StaticFiles::new(config.root.clone()),
            config: Arc::clone(&config),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let config = Arc::clone(&state.config);

        Router::new()
            .fallback(serve_static)
            .with_state(state)
            .layer(middleware::from_fn(access_control_middleware))
            .layer(middleware::from_fn(log_request))
            .layer(middleware::from_fn_with_state(config, inject_headers))
            .layer(TraceLayer::new_for_http())
    }

    /// The fully layered router, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Load TLS material, bind the configured address and serve until
    /// `handle` is shut down.
    pub async fn run(self, handle: Handle) -> Result<(), ServerError> {
        let tls = self.load_tls().await?;
        let listener = Listener::bind(&self.config).await?;
        listener.serve(self.router, tls, handle).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: Listener, handle: Handle) -> Result<(), ServerError> {
        let tls = self.load_tls().await?;
        listener.serve(self.router, tls, handle).await
    }

    async fn load_tls(&self) -> Result<Option<RustlsConfig>, ServerError> {
        match &self.config.tls {
            Some(tls) => Ok(Some(load_tls_config(tls).await?)),
            None => Ok(None),
        }
    }
}
