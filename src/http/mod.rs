//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware order)
//!     → request.rs (request ID, request dump)
//!     → [security::access_control decides 401]
//!     → static_files.rs (ServeDir, directory listing)
//!     → response.rs (cache, extra and CORS headers)
//!     → Send to client
//! ```

pub mod path;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use request::RequestId;
pub use server::{AppState, HttpServer};
pub use static_files::StaticFiles;
