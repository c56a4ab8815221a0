use serde::{Deserialize, Serialize};

use crate::dsp::utils::wrap;
use crate::error::GraphError;

/// Waveform shape, evaluated at a phase in [0, 1).
///
/// The shapes are the swappable leaf math of the oscillator; everything
/// else (phase bookkeeping, amplitude, bus writes) is shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
}

impl Waveform {
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (std::f32::consts::TAU * phase).sin(),
            // Rises from -1 at phase 0 through +1 at phase 0.5 and back.
            Waveform::Triangle => 4.0 * (phase - (phase + 0.5).floor()).abs() - 1.0,
        }
    }
}

/// Periodic generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OscillatorParams {
    pub waveform: Waveform,
    /// frequency in Hz
    pub frequency: f32,
    /// linear gain in [0, 1]
    pub amplitude: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: 440.0,
            amplitude: 1.0,
        }
    }
}

impl OscillatorParams {
    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(GraphError::InvalidParameter {
                field: "frequency",
                value: self.frequency,
            });
        }
        if !self.amplitude.is_finite() || !(0.0..=1.0).contains(&self.amplitude) {
            return Err(GraphError::InvalidParameter {
                field: "amplitude",
                value: self.amplitude,
            });
        }
        Ok(())
    }
}

/// Phase accumulator carried across blocks. An edit changes only the
/// rate of advance, never the accumulated phase, so a frequency change
/// is click-free.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OscillatorState {
    phase: f32,
}

impl OscillatorState {
    pub(crate) fn process(&mut self, out: &mut [f32], params: &OscillatorParams, sample_rate: f32) {
        let step = params.frequency / sample_rate;
        for sample in out {
            *sample = params.amplitude * params.waveform.eval(self.phase);
            self.phase = wrap(self.phase + step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn phase_advances_by_frequency_over_sample_rate() {
        let params = OscillatorParams {
            frequency: 480.0,
            ..Default::default()
        };
        let mut state = OscillatorState::default();
        let mut out = [0.0; 10];
        state.process(&mut out, &params, 48_000.0);
        // 10 samples at 480/48000 per sample.
        assert_relative_eq!(state.phase, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn phase_wraps_without_drift() {
        let params = OscillatorParams {
            frequency: 12_000.0,
            ..Default::default()
        };
        let mut state = OscillatorState::default();
        let mut out = [0.0; 128];
        for _ in 0..100 {
            state.process(&mut out, &params, 48_000.0);
        }
        // 12000/48000 = 0.25 per sample: phase stays on the quarter grid.
        assert!(state.phase >= 0.0 && state.phase < 1.0);
        let quarters = state.phase * 4.0;
        assert_relative_eq!(quarters, quarters.round(), epsilon = 1e-3);
    }

    #[test]
    fn first_sample_starts_at_phase_zero() {
        let params = OscillatorParams::default();
        let mut state = OscillatorState::default();
        let mut out = [1.0; 4];
        state.process(&mut out, &params, 48_000.0);
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-7);
    }

    #[test]
    fn amplitude_scales_output() {
        let params = OscillatorParams {
            frequency: 1000.0,
            amplitude: 0.5,
            ..Default::default()
        };
        let mut state = OscillatorState::default();
        let mut out = [0.0; 64];
        state.process(&mut out, &params, 48_000.0);
        assert!(out.iter().all(|s| s.abs() <= 0.5 + 1e-6));
        assert!(out.iter().any(|s| s.abs() > 0.4));
    }

    #[test]
    fn frequency_edit_preserves_phase() {
        let mut a = OscillatorState::default();
        let mut out = [0.0; 32];
        a.process(
            &mut out,
            &OscillatorParams {
                frequency: 440.0,
                ..Default::default()
            },
            48_000.0,
        );
        let phase_before = a.phase;
        a.process(
            &mut out,
            &OscillatorParams {
                frequency: 880.0,
                ..Default::default()
            },
            48_000.0,
        );
        // First sample of the new block was evaluated at the old phase.
        assert_relative_eq!(
            out[0],
            (std::f32::consts::TAU * phase_before).sin(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn triangle_hits_its_corners() {
        assert_relative_eq!(Waveform::Triangle.eval(0.0), -1.0);
        assert_relative_eq!(Waveform::Triangle.eval(0.25), 0.0);
        assert_relative_eq!(Waveform::Triangle.eval(0.5), 1.0);
        assert_relative_eq!(Waveform::Triangle.eval(0.75), 0.0);
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        assert!(
            OscillatorParams {
                frequency: 0.0,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            OscillatorParams {
                amplitude: -0.1,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            OscillatorParams {
                amplitude: f32::INFINITY,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(OscillatorParams::default().validate().is_ok());
    }
}
