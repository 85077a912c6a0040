//! Countdown state machine

use serde::{Deserialize, Serialize};

use super::DurationDraft;

/// Duration a fresh countdown starts with (15 minutes)
pub const DEFAULT_DURATION_SECONDS: u64 = 15 * 60;

/// Pre-decrement values at which the near-end tick cue sounds
const TICK_CUE_RANGE: std::ops::RangeInclusive<u64> = 2..=6;

/// Lifecycle phase of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Expired,
}

/// Audible cue requested by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The countdown just reached zero
    End,
    /// One of the last few seconds before zero
    Tick,
}

/// Result of committing a new duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationOutcome {
    /// New duration committed, configuration dialog may close
    Applied(u64),
    /// Non-positive total, nothing changed
    Rejected,
}

impl DurationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DurationOutcome::Applied(_))
    }
}

/// Countdown state owned by the controller task
#[derive(Debug, Clone)]
pub struct TimerState {
    remaining_seconds: u64,
    initial_seconds: u64,
    phase: Phase,
}

impl TimerState {
    /// Create an idle countdown of the given length, falling back to the default for zero
    pub fn new(initial_seconds: u64) -> Self {
        let initial_seconds = if initial_seconds == 0 {
            DEFAULT_DURATION_SECONDS
        } else {
            initial_seconds
        };

        Self {
            remaining_seconds: initial_seconds,
            initial_seconds,
            phase: Phase::Idle,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn initial_seconds(&self) -> u64 {
        self.initial_seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True only while a tick source should be scheduled
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Begin counting down. Returns true if the countdown became active.
    ///
    /// A countdown with nothing left stays where it is.
    pub fn start(&mut self) -> bool {
        if self.is_active() || self.remaining_seconds == 0 {
            return false;
        }
        self.phase = Phase::Running;
        true
    }

    /// Pause the countdown. Returns true if it was active.
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = Phase::Idle;
        true
    }

    /// Restore the committed duration and go idle
    pub fn reset(&mut self) {
        self.remaining_seconds = self.initial_seconds;
        self.phase = Phase::Idle;
    }

    /// Commit a new duration of `minutes * 60 + seconds`
    pub fn set_duration(&mut self, minutes: u64, seconds: u64) -> DurationOutcome {
        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds));

        match total {
            Some(total) => self.commit_total(i128::from(total)),
            None => DurationOutcome::Rejected,
        }
    }

    /// Commit the duration typed into a custom duration draft
    pub fn apply_draft(&mut self, draft: &DurationDraft) -> DurationOutcome {
        self.commit_total(draft.total_seconds())
    }

    fn commit_total(&mut self, total: i128) -> DurationOutcome {
        match u64::try_from(total) {
            Ok(total) if total > 0 => {
                self.initial_seconds = total;
                self.remaining_seconds = total;
                self.phase = Phase::Idle;
                DurationOutcome::Applied(total)
            }
            _ => DurationOutcome::Rejected,
        }
    }

    /// Advance by one elapsed second, returning the cue to play if any
    pub fn tick(&mut self) -> Option<Cue> {
        if !self.is_active() {
            return None;
        }

        let previous = self.remaining_seconds;
        if previous <= 1 {
            self.remaining_seconds = 0;
            self.phase = Phase::Expired;
            return Some(Cue::End);
        }

        self.remaining_seconds = previous - 1;
        TICK_CUE_RANGE.contains(&previous).then_some(Cue::Tick)
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            remaining_seconds: self.remaining_seconds,
            initial_seconds: self.initial_seconds,
            active: self.is_active(),
            phase: self.phase,
            display: format_clock(self.remaining_seconds),
            progress: self.remaining_seconds as f64 / self.initial_seconds as f64,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECONDS)
    }
}

/// Published countdown state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub remaining_seconds: u64,
    pub initial_seconds: u64,
    pub active: bool,
    pub phase: Phase,
    /// Remaining time as `MM:SS`
    pub display: String,
    /// Fraction of the committed duration still left
    pub progress: f64,
}

/// Format seconds as zero-padded `MM:SS`; minutes are not wrapped into hours
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
