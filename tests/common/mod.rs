//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use axum_server::Handle;
use tempfile::TempDir;
use tower::ServiceExt;

use cors_https_server::config::ServerConfig;
use cors_https_server::net::Listener;
use cors_https_server::HttpServer;

pub const HELLO: &str = "hello, world\n";
pub const SECRET: &str = "the cake is a lie\n";

/// A throwaway document root:
///
/// ```text
/// hello.txt
/// secret.txt
/// lib/jquery-3.7.1.min.js
/// sub/a.txt
/// sub/B.txt
/// ```
pub fn docroot() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::write(root.join("hello.txt"), HELLO).unwrap();
    std::fs::write(root.join("secret.txt"), SECRET).unwrap();
    std::fs::create_dir(root.join("lib")).unwrap();
    std::fs::write(root.join("lib/jquery-3.7.1.min.js"), "/*! jQuery */").unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::write(root.join("sub/a.txt"), "a").unwrap();
    std::fs::write(root.join("sub/B.txt"), "b").unwrap();

    dir
}

/// Plain-HTTP config serving `root`.
pub fn config_for(root: &TempDir) -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".into(),
        port: 0,
        root: root.path().to_path_buf(),
        tls: None,
        ..ServerConfig::default()
    }
}

pub fn router(config: ServerConfig) -> Router {
    HttpServer::new(config).router()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Drive one request through the full middleware stack without a socket.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server(config: ServerConfig) -> (SocketAddr, Handle) {
    let listener = Listener::bind(&config).await.unwrap();
    let addr = listener.local_addr();
    let handle = Handle::new();

    let server = HttpServer::new(config);
    let server_handle = handle.clone();
    tokio::spawn(async move {
        let _ = server.serve(listener, server_handle).await;
    });

    (addr, handle)
}
