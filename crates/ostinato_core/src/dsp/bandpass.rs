use serde::{Deserialize, Serialize};

use crate::dsp::utils::changed;
use crate::error::GraphError;

/// Bandpass filter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BandpassParams {
    /// center frequency in Hz
    pub center: f32,
    /// filter Q
    pub resonance: f32,
    /// output gain in [0, 1]
    pub amplitude: f32,
}

impl Default for BandpassParams {
    fn default() -> Self {
        Self {
            center: 1_000.0,
            resonance: 0.707,
            amplitude: 1.0,
        }
    }
}

impl BandpassParams {
    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if !self.center.is_finite() || self.center <= 0.0 {
            return Err(GraphError::InvalidParameter {
                field: "center",
                value: self.center,
            });
        }
        if !self.resonance.is_finite() || self.resonance <= 0.0 || self.resonance > 10.0 {
            return Err(GraphError::InvalidParameter {
                field: "resonance",
                value: self.resonance,
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

#[derive(Debug, Clone, Copy, Default)]
struct BiquadCoeffs {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

fn compute_biquad(center: f32, resonance: f32, sample_rate: f32) -> BiquadCoeffs {
    let freq = center.min(sample_rate * 0.45).max(20.0);

    let omega = std::f32::consts::TAU * freq / sample_rate;
    let sin_omega = omega.sin();
    let cos_omega = omega.cos();
    let alpha = sin_omega / (2.0 * resonance);

    let b0 = alpha;
    let b1 = 0.0;
    let b2 = -alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoeffs {
        b0: b0 / a0,
        b1: b1 / a0,
        b2: b2 / a0,
        a1: a1 / a0,
        a2: a2 / a0,
    }
}

/// Direct-form II biquad memory, private to one operation. Coefficients
/// are recomputed only when center or resonance actually change.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BiquadState {
    z1: f32,
    z2: f32,
    coeffs: BiquadCoeffs,
    last_center: f32,
    last_resonance: f32,
}

impl BiquadState {
    pub(crate) fn process(
        &mut self,
        out: &mut [f32],
        input: &[f32],
        params: &BandpassParams,
        sample_rate: f32,
    ) {
        if changed(params.center, self.last_center)
            || changed(params.resonance, self.last_resonance)
        {
            self.coeffs = compute_biquad(params.center, params.resonance, sample_rate);
            self.last_center = params.center;
            self.last_resonance = params.resonance;
        }

        let c = self.coeffs;
        for (sample, &x) in out.iter_mut().zip(input) {
            let w = x - c.a1 * self.z1 - c.a2 * self.z2;
            let y = c.b0 * w + c.b1 * self.z1 + c.b2 * self.z2;

            self.z2 = self.z1;
            self.z1 = w;
            *sample = params.amplitude * y;
        }
    }
}
