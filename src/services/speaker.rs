//! Default audio device backend
//!
//! The device stream cannot leave the thread that opened it, so each acquired
//! output owns a dedicated thread fed through a channel.

use std::{sync::mpsc, thread};

use rodio::OutputStream;
use tracing::{debug, warn};

use super::{
    synth::ToneSource,
    tone::{AudioError, ToneBackend, ToneOutput, ToneRequest},
};

/// Plays tones on the system's default output device
#[derive(Debug, Default, Clone, Copy)]
pub struct SpeakerBackend;

impl ToneBackend for SpeakerBackend {
    fn open(&self) -> Result<Box<dyn ToneOutput>, AudioError> {
        let (request_tx, request_rx) = mpsc::channel::<ToneRequest>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), AudioError>>(1);

        thread::Builder::new()
            .name("tone-output".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                for request in request_rx {
                    if let Err(e) = handle.play_raw(ToneSource::new(&request)) {
                        warn!("Audio device rejected tone: {}", AudioError::Play(e));
                    }
                }
                debug!("Tone output thread exiting");
            })
            .map_err(|e| AudioError::Unavailable(format!("Failed to spawn audio thread: {}", e)))?;

        ready_rx
            .recv()
            .map_err(|_| AudioError::Unavailable("audio thread exited during startup".to_string()))??;

        Ok(Box::new(SpeakerOutput { requests: request_tx }))
    }
}

struct SpeakerOutput {
    requests: mpsc::Sender<ToneRequest>,
}

impl ToneOutput for SpeakerOutput {
    fn play(&mut self, request: &ToneRequest) -> Result<(), AudioError> {
        self.requests.send(*request).map_err(|_| AudioError::Closed)
    }
}
