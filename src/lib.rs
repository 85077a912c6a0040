//! Workout Timer - An interval countdown timer with synthesized audio cues
//!
//! This library provides the countdown state machine, the tone signal service
//! that sounds the last-seconds and expiry cues, and a local HTTP control panel.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use tasks::{spawn_countdown, CountdownHandle};
pub use utils::signals::shutdown_signal;
