//! Error types for startup and serving.
//!
//! Per-request failures never surface here: they are turned into HTTP
//! responses by the handler stack. These errors are all fatal and end the
//! process before (or instead of) accepting traffic.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid configuration detected before the listener is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Extra header without a `:` separator.
    #[error("malformed header {0:?}: expected \"Name: Value\"")]
    MalformedHeader(String),

    #[error("invalid header name {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid header value in {0:?}")]
    InvalidHeaderValue(String),

    /// Certificate or key file could not be read.
    #[error("cannot read TLS material {path:?}: {source}")]
    TlsMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no certificate found in {0:?}")]
    MissingCertificate(PathBuf),

    #[error("no private key found in {0:?}")]
    MissingPrivateKey(PathBuf),

    #[error("document root {0:?} is not a directory")]
    RootNotDirectory(PathBuf),

    /// Bind address did not resolve to any socket address.
    #[error("cannot resolve bind address {0:?}")]
    Address(String),
}

/// Server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
