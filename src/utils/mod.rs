//! Utility functions module
//!
//! Process-level helpers, currently shutdown signal handling.

pub mod signals;

pub use signals::shutdown_signal;
