//! Workout Timer - An interval countdown timer with synthesized audio cues
//!
//! This is the main entry point for the workout-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use workout_timer::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{SpeakerBackend, ToneSignalService},
    tasks::{countdown_display_task, spawn_countdown},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("workout_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting workout-timer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, mute={}",
          config.host, config.port, config.duration_seconds(), config.mute);

    let tones = if config.mute {
        ToneSignalService::muted()
    } else {
        ToneSignalService::new(SpeakerBackend)
    };

    // Start the countdown controller and the display that follows it
    let countdown = spawn_countdown(config.duration_seconds(), tones);
    tokio::spawn(countdown_display_task(countdown.subscribe()));

    let state = Arc::new(AppState::new(countdown.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control panel running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start the countdown");
    info!("  POST /stop     - Pause the countdown");
    info!("  POST /toggle   - Start or pause the countdown");
    info!("  POST /reset    - Reset to the configured duration");
    info!("  POST /duration - Set a custom duration {{\"minutes\": \"15\", \"seconds\": \"00\"}}");
    info!("  GET  /status   - Current countdown status");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = countdown.shutdown().await {
        tracing::warn!("Countdown controller already stopped: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
