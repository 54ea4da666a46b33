//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (cookie check on the protected path)
//!     → Pass to file serving
//! ```
//!
//! The cookie check is a fixed-value equality test for exercising
//! client code, not an authentication scheme.

pub mod access_control;

pub use access_control::{access_control_middleware, is_authorized};
