//! Observability subsystem.
//!
//! Everything is logged through `tracing`: startup summary, one dump per
//! request (see `http::request`), and the tower-http trace spans.

pub mod logging;

pub use logging::init_logging;
