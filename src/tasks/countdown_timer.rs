//! Countdown controller task
//!
//! One task owns the countdown state, the tone service and at most one tick
//! source. Operations arrive as commands and are acknowledged only after they
//! have been applied, so a pending tick is always cancelled by the time
//! `stop`, `reset` or a duration change returns.

use std::{future, time::Duration};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{interval_at, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    services::ToneSignalService,
    state::{CountdownSnapshot, Cue, DurationDraft, DurationOutcome, TimerState},
};

/// Period of the countdown tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

type Reply = oneshot::Sender<CountdownSnapshot>;
type DurationReply = oneshot::Sender<(DurationOutcome, CountdownSnapshot)>;

#[derive(Debug)]
enum Command {
    Start(Reply),
    Stop(Reply),
    Toggle(Reply),
    Reset(Reply),
    SetDuration {
        minutes: u64,
        seconds: u64,
        reply: DurationReply,
    },
    ApplyDraft {
        draft: DurationDraft,
        reply: DurationReply,
    },
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running countdown controller
#[derive(Debug, Clone)]
pub struct CountdownHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<CountdownSnapshot>,
}

impl CountdownHandle {
    /// Start (or resume) the countdown and prepare audio output
    pub async fn start(&self) -> Result<CountdownSnapshot, String> {
        self.request(Command::Start).await
    }

    /// Pause the countdown
    pub async fn stop(&self) -> Result<CountdownSnapshot, String> {
        self.request(Command::Stop).await
    }

    /// Start when inactive, stop when active
    pub async fn toggle(&self) -> Result<CountdownSnapshot, String> {
        self.request(Command::Toggle).await
    }

    /// Restore the committed duration and go idle
    pub async fn reset(&self) -> Result<CountdownSnapshot, String> {
        self.request(Command::Reset).await
    }

    pub async fn set_duration(
        &self,
        minutes: u64,
        seconds: u64,
    ) -> Result<(DurationOutcome, CountdownSnapshot), String> {
        self.request(|reply| Command::SetDuration {
            minutes,
            seconds,
            reply,
        })
        .await
    }

    /// Commit the duration typed into the configuration dialog
    pub async fn apply_draft(
        &self,
        draft: DurationDraft,
    ) -> Result<(DurationOutcome, CountdownSnapshot), String> {
        self.request(|reply| Command::ApplyDraft { draft, reply }).await
    }

    /// Stop the controller task; its tick source is dropped with it
    pub async fn shutdown(&self) -> Result<(), String> {
        self.request(Command::Shutdown).await
    }

    /// Latest published state
    pub fn snapshot(&self) -> CountdownSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Watch every published state change
    pub fn subscribe(&self) -> watch::Receiver<CountdownSnapshot> {
        self.snapshots.clone()
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| "Countdown controller is not running".to_string())?;
        reply_rx
            .await
            .map_err(|_| "Countdown controller dropped the request".to_string())
    }
}

/// Spawn a countdown controller on the current tokio runtime
pub fn spawn_countdown(initial_seconds: u64, tones: ToneSignalService) -> CountdownHandle {
    let state = TimerState::new(initial_seconds);
    let (command_tx, command_rx) = mpsc::channel(32);
    let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

    let timer = CountdownTimer {
        state,
        tones,
        ticker: None,
        snapshot_tx,
    };
    tokio::spawn(countdown_timer_task(timer, command_rx));

    CountdownHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    }
}

struct CountdownTimer {
    state: TimerState,
    tones: ToneSignalService,
    /// The single tick source; present exactly while the countdown is active
    ticker: Option<Interval>,
    snapshot_tx: watch::Sender<CountdownSnapshot>,
}

impl CountdownTimer {
    /// Apply a command. Returns false when the task should exit.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Start(reply) => {
                self.start();
                let _ = reply.send(self.publish());
            }
            Command::Stop(reply) => {
                if self.state.stop() {
                    info!("Countdown paused at {}", self.state.remaining_seconds());
                }
                let _ = reply.send(self.publish());
            }
            Command::Toggle(reply) => {
                if self.state.stop() {
                    info!("Countdown paused at {}", self.state.remaining_seconds());
                } else {
                    self.start();
                }
                let _ = reply.send(self.publish());
            }
            Command::Reset(reply) => {
                self.state.reset();
                info!("Countdown reset to {}s", self.state.initial_seconds());
                let _ = reply.send(self.publish());
            }
            Command::SetDuration {
                minutes,
                seconds,
                reply,
            } => {
                let outcome = self.state.set_duration(minutes, seconds);
                self.log_duration(outcome);
                let _ = reply.send((outcome, self.publish()));
            }
            Command::ApplyDraft { draft, reply } => {
                let outcome = self.state.apply_draft(&draft);
                self.log_duration(outcome);
                let _ = reply.send((outcome, self.publish()));
            }
            Command::Shutdown(reply) => {
                self.ticker = None;
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    fn start(&mut self) {
        if self.state.is_active() {
            return;
        }
        // Audio must be acquired from the user's action, ahead of the first cue
        self.tones.prepare();

        if self.state.start() {
            info!("Countdown started with {}s remaining", self.state.remaining_seconds());
        } else {
            debug!("Nothing left to count down, start ignored");
        }
    }

    fn on_tick(&mut self) {
        match self.state.tick() {
            Some(Cue::End) => {
                info!("Countdown expired");
                self.tones.emit_end_cue();
            }
            Some(Cue::Tick) => self.tones.emit_tick_cue(),
            None => {}
        }
        self.publish();
    }

    fn log_duration(&self, outcome: DurationOutcome) {
        match outcome {
            DurationOutcome::Applied(total) => info!("Countdown duration set to {}s", total),
            DurationOutcome::Rejected => debug!("Rejected non-positive countdown duration"),
        }
    }

    /// Bring the tick source in line with the state, then publish the state
    fn publish(&mut self) -> CountdownSnapshot {
        match (self.state.is_active(), self.ticker.is_some()) {
            (true, false) => {
                let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
                debug!("Tick source scheduled");
            }
            (false, true) => {
                self.ticker = None;
                debug!("Tick source cancelled");
            }
            _ => {}
        }

        let snapshot = self.state.snapshot();
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}

async fn countdown_timer_task(mut timer: CountdownTimer, mut commands: mpsc::Receiver<Command>) {
    info!("Starting countdown timer task");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    if !timer.handle(command) {
                        info!("Countdown timer shutdown requested");
                        break;
                    }
                }
                None => {
                    debug!("All countdown handles dropped");
                    break;
                }
            },
            _ = next_tick(&mut timer.ticker) => timer.on_tick(),
        }
    }

    info!("Countdown timer task stopped");
}
