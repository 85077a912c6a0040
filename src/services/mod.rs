//! Audio services module
//!
//! This module contains the tone signal service, the tone synthesizer and the
//! audio device backend it plays through.

pub mod speaker;
pub mod synth;
pub mod tone;

// Re-export main types
pub use speaker::SpeakerBackend;
pub use tone::{
    AudioError, MutedBackend, ToneBackend, ToneOutput, ToneRequest, ToneSignalService, Waveform,
};
