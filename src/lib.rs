//! HTTPS static-file server for local development.
//!
//! Serves a directory tree over TLS. Every response gets cache-busting,
//! CORS and user-supplied headers, and `/secret.txt` answers 401 unless the
//! request carries the `auth=1` cookie.
//!
//! ```text
//!     Client ──▶ net (listener, rustls) ──▶ http (log → cookie check → files)
//!        ◀──────────── response headers injected ◀─────────┘
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod security;

pub use config::{Cli, ServerConfig};
pub use error::{ConfigError, ServerError};
pub use http::HttpServer;
