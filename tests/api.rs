use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use workout_timer::{create_router, services::ToneSignalService, spawn_countdown, AppState};

fn app(initial_seconds: u64) -> Router {
    let countdown = spawn_countdown(initial_seconds, ToneSignalService::muted());
    let state = Arc::new(AppState::new(countdown, 20554, "127.0.0.1".to_string()));
    create_router(state)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn health_reports_ok() {
    let app = app(900);
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn status_shows_default_countdown() {
    let app = app(900);
    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countdown"]["remaining_seconds"], 900);
    assert_eq!(body["countdown"]["display"], "15:00");
    assert_eq!(body["countdown"]["phase"], "idle");
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn start_stop_and_reset() {
    let app = app(60);

    let (status, body) = call(&app, "POST", "/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["countdown"]["active"], true);

    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

    let (_, body) = call(&app, "POST", "/stop", None).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["countdown"]["remaining_seconds"], 58);

    let (_, body) = call(&app, "POST", "/reset", None).await;
    assert_eq!(body["countdown"]["remaining_seconds"], 60);

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], "reset");
}

#[tokio::test(start_paused = true)]
async fn toggle_flips_active() {
    let app = app(60);
    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["countdown"]["active"], true);
    let (_, body) = call(&app, "POST", "/toggle", None).await;
    assert_eq!(body["countdown"]["active"], false);
}

#[tokio::test(start_paused = true)]
async fn duration_draft_is_applied() {
    let app = app(900);
    let (status, body) = call(
        &app,
        "POST",
        "/duration",
        Some(json!({ "minutes": "2", "seconds": "05" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], true);
    assert_eq!(body["countdown"]["initial_seconds"], 125);
    assert_eq!(body["countdown"]["display"], "02:05");
}

#[tokio::test(start_paused = true)]
async fn zero_duration_draft_leaves_countdown_unchanged() {
    let app = app(900);
    let (status, body) = call(
        &app,
        "POST",
        "/duration",
        Some(json!({ "minutes": "0", "seconds": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"], false);
    assert_eq!(body["countdown"]["initial_seconds"], 900);

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], Value::Null);
}
