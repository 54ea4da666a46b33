//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command line
//!     → cli.rs (parse flags, split extra headers)
//!     → validation.rs (document root, TLS files)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with every request
//! ```
//!
//! Config is immutable once built; there is no reload.

pub mod cli;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use schema::{ExtraHeader, OriginPolicy, ServerConfig, TlsConfig, AUTH_COOKIE, PROTECTED_PATH};
pub use validation::validate_config;
