//! Tone synthesis: oscillator shapes and the decaying gain envelope

use std::{f32::consts::PI, time::Duration};

use rodio::Source;

use super::tone::{ToneRequest, Waveform};

pub const SAMPLE_RATE: u32 = 44_100;

/// Gain at the start of every tone
pub const START_GAIN: f32 = 0.1;
/// Gain the envelope decays towards by the end of the tone
pub const END_GAIN: f32 = 0.000_01;

impl Waveform {
    /// Sample the waveform at `phase`, a fraction of one cycle in `[0, 1)`
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// Exponential ramp from `START_GAIN` at `t = 0` to `END_GAIN` at `t = duration`
pub fn envelope_gain(t: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return END_GAIN;
    }
    let progress = (t / duration).clamp(0.0, 1.0);
    START_GAIN * (END_GAIN / START_GAIN).powf(progress)
}

/// Mono source playing a single enveloped tone
#[derive(Debug, Clone)]
pub struct ToneSource {
    frequency_hz: f32,
    duration_seconds: f32,
    waveform: Waveform,
    sample_idx: usize,
    total_samples: usize,
}

impl ToneSource {
    pub fn new(request: &ToneRequest) -> Self {
        let total_samples = (request.duration_seconds * SAMPLE_RATE as f32) as usize;
        Self {
            frequency_hz: request.frequency_hz,
            duration_seconds: request.duration_seconds,
            waveform: request.waveform,
            sample_idx: 0,
            total_samples,
        }
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.sample_idx >= self.total_samples {
            return None;
        }

        let t = self.sample_idx as f32 / SAMPLE_RATE as f32;
        let phase = (self.frequency_hz * t).fract();
        let sample = self.waveform.sample(phase) * envelope_gain(t, self.duration_seconds);

        self.sample_idx += 1;
        Some(sample)
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.sample_idx)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.duration_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn envelope_starts_low_and_decays_to_near_silence() {
        assert!(close(envelope_gain(0.0, 0.3), START_GAIN));
        assert!(envelope_gain(0.3, 0.3) <= END_GAIN * 1.01);
        assert!(envelope_gain(0.1, 0.3) > envelope_gain(0.2, 0.3));
    }

    #[test]
    fn envelope_is_exponential() {
        // Halfway through, the gain is the geometric mean of the endpoints
        let mid = envelope_gain(0.05, 0.1);
        assert!(close(mid, (START_GAIN * END_GAIN).sqrt()));
    }

    #[test]
    fn waveform_shapes() {
        assert!(close(Waveform::Sine.sample(0.25), 1.0));
        assert_eq!(Waveform::Square.sample(0.1), 1.0);
        assert_eq!(Waveform::Square.sample(0.6), -1.0);
        assert!(close(Waveform::Sawtooth.sample(0.0), -1.0));
        assert!(close(Waveform::Triangle.sample(0.5), 1.0));
    }

    #[test]
    fn source_length_matches_duration() {
        let source = ToneSource::new(&ToneRequest::new(600.0, 0.05, Waveform::Sine));
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), SAMPLE_RATE);
        let samples: Vec<f32> = source.collect();
        assert_eq!(samples.len(), 2205);
        assert!(samples.iter().all(|s| s.abs() <= START_GAIN + 1e-6));
    }
}
