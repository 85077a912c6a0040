//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::state::{AppState, CountdownSnapshot, DurationDraft};
use super::responses::{ApiResponse, DurationResponse, HealthResponse, StatusResponse};

fn respond(
    state: &AppState,
    action: &str,
    result: Result<CountdownSnapshot, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(countdown) => {
            state.record_action(action);
            info!("{} endpoint called - countdown at {}", action, countdown.display);
            Ok(Json(ApiResponse::new(
                format!("Countdown {} at {}", action, countdown.display),
                countdown,
            )))
        }
        Err(e) => {
            error!("Failed to {} countdown: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.countdown.start().await;
    respond(&state, "start", result)
}

/// Handle POST /stop - Pause the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.countdown.stop().await;
    respond(&state, "stop", result)
}

/// Handle POST /toggle - Start or pause, like the play/pause button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.countdown.toggle().await;
    respond(&state, "toggle", result)
}

/// Handle POST /reset - Restore the committed duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.countdown.reset().await;
    respond(&state, "reset", result)
}

/// Handle POST /duration - Apply a custom duration draft
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<DurationDraft>,
) -> Result<Json<DurationResponse>, StatusCode> {
    match state.countdown.apply_draft(draft).await {
        Ok((outcome, countdown)) if outcome.is_applied() => {
            state.record_action("duration");
            info!("Duration endpoint called - countdown set to {}", countdown.display);
            Ok(Json(DurationResponse::applied(countdown)))
        }
        Ok((_, countdown)) => Ok(Json(DurationResponse::unchanged(countdown))),
        Err(e) => {
            error!("Failed to apply countdown duration: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        countdown: state.countdown.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
