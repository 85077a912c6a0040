//! Tone signal service: lazily acquired audio output and the two countdown cues

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Oscillator shape of a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Longest tone the service will synthesize
pub const MAX_TONE_SECONDS: f32 = 10.0;

/// One tone to synthesize, consumed immediately
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneRequest {
    pub frequency_hz: f32,
    pub duration_seconds: f32,
    pub waveform: Waveform,
}

impl ToneRequest {
    pub fn new(frequency_hz: f32, duration_seconds: f32, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration_seconds,
            waveform,
        }
    }

    /// High, longer, harsh tone for an expired countdown
    pub fn end_cue() -> Self {
        Self::new(1200.0, 0.3, Waveform::Square)
    }

    /// Low, very short, smooth tone for the last seconds
    pub fn tick_cue() -> Self {
        Self::new(600.0, 0.05, Waveform::Sine)
    }

    fn validate(&self) -> Result<(), AudioError> {
        let audible = self.frequency_hz.is_finite() && self.frequency_hz > 0.0;
        let timed = self.duration_seconds > 0.0 && self.duration_seconds <= MAX_TONE_SECONDS;
        if audible && timed {
            Ok(())
        } else {
            Err(AudioError::InvalidTone(*self))
        }
    }
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio output unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to initialize audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("Failed to play tone: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("Audio output closed")]
    Closed,
    #[error("Invalid tone request: {0:?}")]
    InvalidTone(ToneRequest),
}

/// Source of audio outputs; opening may fail when the platform has no device
pub trait ToneBackend: Send {
    fn open(&self) -> Result<Box<dyn ToneOutput>, AudioError>;
}

/// An acquired audio output
pub trait ToneOutput: Send {
    fn play(&mut self, request: &ToneRequest) -> Result<(), AudioError>;
}

/// Backend for running without sound
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedBackend;

impl ToneBackend for MutedBackend {
    fn open(&self) -> Result<Box<dyn ToneOutput>, AudioError> {
        Err(AudioError::Unavailable("audio is muted".to_string()))
    }
}

/// Plays the countdown cues, degrading to silence when audio is unavailable
pub struct ToneSignalService {
    backend: Box<dyn ToneBackend>,
    output: Option<Box<dyn ToneOutput>>,
    /// Set after a failed open; cleared by the next explicit `prepare`
    open_failed: bool,
}

impl ToneSignalService {
    pub fn new(backend: impl ToneBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            output: None,
            open_failed: false,
        }
    }

    /// Service that never makes a sound
    pub fn muted() -> Self {
        Self::new(MutedBackend)
    }

    pub fn is_prepared(&self) -> bool {
        self.output.is_some()
    }

    /// Acquire the audio output if not already held, retrying a previous failure
    pub fn prepare(&mut self) {
        self.open_failed = false;
        self.acquire();
    }

    fn acquire(&mut self) {
        if self.output.is_some() || self.open_failed {
            return;
        }

        match self.backend.open() {
            Ok(output) => {
                info!("Audio output acquired");
                self.output = Some(output);
            }
            Err(e) => {
                debug!("Audio output not acquired: {}", e);
                self.open_failed = true;
            }
        }
    }

    /// Synthesize one tone; silently does nothing without an audio output
    pub fn emit(&mut self, frequency_hz: f32, duration_seconds: f32, waveform: Waveform) {
        self.emit_request(ToneRequest::new(frequency_hz, duration_seconds, waveform));
    }

    pub fn emit_end_cue(&mut self) {
        self.emit_request(ToneRequest::end_cue());
    }

    pub fn emit_tick_cue(&mut self) {
        self.emit_request(ToneRequest::tick_cue());
    }

    fn emit_request(&mut self, request: ToneRequest) {
        if let Err(e) = request.validate() {
            warn!("Skipping tone: {}", e);
            return;
        }

        self.acquire();
        let Some(output) = self.output.as_mut() else {
            return;
        };

        match output.play(&request) {
            Ok(()) => debug!(
                "Played {:?} tone at {}Hz for {}s",
                request.waveform, request.frequency_hz, request.duration_seconds
            ),
            Err(AudioError::Closed) => {
                warn!("Audio output closed, will reacquire on next tone");
                self.output = None;
            }
            Err(e) => warn!("Failed to play tone: {}", e),
        }
    }
}

impl std::fmt::Debug for ToneSignalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneSignalService")
            .field("prepared", &self.is_prepared())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[derive(Clone, Default)]
    struct Recorder {
        opens: Arc<AtomicUsize>,
        played: Arc<Mutex<Vec<ToneRequest>>>,
        fail_open: bool,
    }

    struct RecorderOutput(Arc<Mutex<Vec<ToneRequest>>>);

    impl ToneOutput for RecorderOutput {
        fn play(&mut self, request: &ToneRequest) -> Result<(), AudioError> {
            self.0.lock().unwrap().push(*request);
            Ok(())
        }
    }

    impl ToneBackend for Recorder {
        fn open(&self) -> Result<Box<dyn ToneOutput>, AudioError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(AudioError::Unavailable("no device".to_string()));
            }
            Ok(Box::new(RecorderOutput(Arc::clone(&self.played))))
        }
    }

    #[test]
    fn prepare_acquires_once() {
        let recorder = Recorder::default();
        let mut service = ToneSignalService::new(recorder.clone());
        service.prepare();
        service.prepare();
        service.emit_tick_cue();
        assert!(service.is_prepared());
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn emit_prepares_lazily() {
        let recorder = Recorder::default();
        let mut service = ToneSignalService::new(recorder.clone());
        service.emit(440.0, 0.1, Waveform::Triangle);
        assert_eq!(
            *recorder.played.lock().unwrap(),
            vec![ToneRequest::new(440.0, 0.1, Waveform::Triangle)]
        );
    }

    #[test]
    fn cues_use_their_profiles() {
        let recorder = Recorder::default();
        let mut service = ToneSignalService::new(recorder.clone());
        service.emit_end_cue();
        service.emit_tick_cue();

        let played = recorder.played.lock().unwrap();
        assert_eq!(played[0], ToneRequest::new(1200.0, 0.3, Waveform::Square));
        assert_eq!(played[1], ToneRequest::new(600.0, 0.05, Waveform::Sine));
    }

    #[test]
    fn unavailable_audio_is_silent() {
        let recorder = Recorder {
            fail_open: true,
            ..Recorder::default()
        };
        let mut service = ToneSignalService::new(recorder.clone());
        service.prepare();
        service.emit_end_cue();
        service.emit_tick_cue();
        assert!(!service.is_prepared());
        assert!(recorder.played.lock().unwrap().is_empty());
        assert_eq!(
            recorder.opens.load(Ordering::SeqCst),
            1,
            "cues do not reopen a device that just failed"
        );

        service.prepare();
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn first_cue_opens_output_without_prepare() {
        let recorder = Recorder {
            fail_open: true,
            ..Recorder::default()
        };
        let mut service = ToneSignalService::new(recorder.clone());
        service.emit_tick_cue();
        service.emit_tick_cue();
        assert_eq!(recorder.opens.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn invalid_requests_are_skipped() {
        let recorder = Recorder::default();
        let mut service = ToneSignalService::new(recorder.clone());
        service.emit(0.0, 0.1, Waveform::Sine);
        service.emit(440.0, f32::NAN, Waveform::Sine);
        service.emit(440.0, 1e30, Waveform::Sine);
        service.emit(440.0, f32::INFINITY, Waveform::Square);
        service.emit(440.0, MAX_TONE_SECONDS + 0.5, Waveform::Sine);
        assert!(recorder.played.lock().unwrap().is_empty());
    }

    #[test]
    fn longest_allowed_tone_plays() {
        let recorder = Recorder::default();
        let mut service = ToneSignalService::new(recorder.clone());
        service.emit(440.0, MAX_TONE_SECONDS, Waveform::Sawtooth);
        assert_eq!(recorder.played.lock().unwrap().len(), 1);
    }

    #[test]
    fn muted_service_never_prepares() {
        let mut service = ToneSignalService::muted();
        service.prepare();
        service.emit_end_cue();
        assert!(!service.is_prepared());
    }
}
