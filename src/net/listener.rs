//! TCP listener implementation.
//!
//! # Responsibilities
//! - Resolve and bind the configured address
//! - Hand the bound socket to axum-server, plain or wrapped in rustls
//! - Stop accepting when the shutdown handle fires
//!
//! Every accepted connection is driven on its own tokio task by axum-server,
//! so a failed TLS handshake or a broken client only ends that task.

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ConfigError, ServerError};

/// A bound listening socket, not yet accepting connections.
pub struct Listener {
    inner: std::net::TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address and port.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = resolve(&config.address, config.port).await?;

        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ServerError::Bind)?;
        let inner = listener.into_std().map_err(ServerError::Bind)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve `app` until `handle` is shut down.
    ///
    /// With `tls` set, every connection performs a rustls server handshake
    /// before any HTTP bytes are read.
    pub async fn serve(
        self,
        app: Router,
        tls: Option<RustlsConfig>,
        handle: Handle,
    ) -> Result<(), ServerError> {
        let service = app.into_make_service_with_connect_info::<SocketAddr>();

        let result = match tls {
            Some(tls) => {
                tracing::info!(address = %self.local_addr, "Serving HTTPS");
                axum_server::from_tcp_rustls(self.inner, tls)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            None => {
                tracing::info!(address = %self.local_addr, "Serving plain HTTP");
                axum_server::from_tcp(self.inner)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        };

        result.map_err(ServerError::Serve)
    }
}

/// Resolve `address` to a socket address; IP literals skip the resolver.
async fn resolve(address: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    if let Ok(ip) = address.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    tokio::net::lookup_host((address, port))
        .await
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| ConfigError::Address(address.to_string()))
}
