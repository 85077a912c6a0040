//! Countdown display background task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::state::{CountdownSnapshot, Phase};

/// Follow published countdown states and render them to the log
pub async fn countdown_display_task(mut snapshots: watch::Receiver<CountdownSnapshot>) {
    info!("Starting countdown display task");

    let mut last_phase = snapshots.borrow_and_update().phase;

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();

        if snapshot.phase != last_phase {
            match snapshot.phase {
                Phase::Running => info!("Countdown running, {} remaining", snapshot.display),
                Phase::Idle => info!("Countdown idle at {} of {}s", snapshot.display, snapshot.initial_seconds),
                Phase::Expired => info!("Time is up!"),
            }
            last_phase = snapshot.phase;
        } else {
            debug!("{} ({:.0}%)", snapshot.display, snapshot.progress * 100.0);
        }
    }

    debug!("Countdown display task stopped");
}
