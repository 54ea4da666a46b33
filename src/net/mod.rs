//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept loop via axum-server)
//!     → tls.rs (optional rustls handshake)
//!     → Hand off to HTTP layer
//! ```
//!
//! - One tokio task per connection; nothing is shared between them
//! - TLS is optional and handled transparently by the acceptor

pub mod listener;
pub mod tls;

pub use listener::Listener;
pub use tls::load_tls_config;
