//! State management module
//!
//! This module contains the countdown state machine, the custom duration draft
//! and the shared application state used by the HTTP layer.

pub mod app_state;
pub mod duration_draft;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use duration_draft::DurationDraft;
pub use timer_state::{
    format_clock, CountdownSnapshot, Cue, DurationOutcome, Phase, TimerState,
    DEFAULT_DURATION_SECONDS,
};
