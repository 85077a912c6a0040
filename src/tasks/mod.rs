//! Background tasks module
//!
//! This module contains the countdown controller task and the display task
//! that follows it.

pub mod countdown_display;
pub mod countdown_timer;

// Re-export main functions
pub use countdown_display::countdown_display_task;
pub use countdown_timer::{spawn_countdown, CountdownHandle, TICK_INTERVAL};
