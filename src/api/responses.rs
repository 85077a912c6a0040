//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{CountdownSnapshot, Phase};

/// API response structure for countdown control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: Phase,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownSnapshot,
}

impl ApiResponse {
    pub fn new(message: String, countdown: CountdownSnapshot) -> Self {
        Self {
            status: countdown.phase,
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }
}

/// Response to a custom duration submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationResponse {
    /// True when the duration was committed and the dialog may close
    pub applied: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownSnapshot,
}

impl DurationResponse {
    pub fn applied(countdown: CountdownSnapshot) -> Self {
        Self {
            applied: true,
            message: format!("Countdown set to {}", countdown.display),
            timestamp: Utc::now(),
            countdown,
        }
    }

    pub fn unchanged(countdown: CountdownSnapshot) -> Self {
        Self {
            applied: false,
            message: "Countdown unchanged".to_string(),
            timestamp: Utc::now(),
            countdown,
        }
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
