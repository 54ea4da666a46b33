//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Validate → Load TLS → Bind → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Close listener → Exit
//! ```
//!
//! - Fail fast: any startup error is fatal before the socket is bound
//! - No drain on shutdown

pub mod signals;

pub use signals::{shutdown_on_signal, shutdown_signal};
