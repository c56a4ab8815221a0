//! Concrete per-block operations and their private state.

pub mod bandpass;
pub mod oscillator;
pub mod scalar;
pub mod utils;

pub use bandpass::BandpassParams;
pub use oscillator::{OscillatorParams, Waveform};
pub use scalar::ScalarParams;

use std::sync::Arc;

use crate::bus::{BusBank, BusId};
use crate::module::{Module, Params};

/// A graph node: one module bound to its target bus, plus whatever state
/// its kind carries across blocks (phase accumulator, filter memory).
/// That state is private to the operation; buses are the only channel
/// between operations.
pub struct Operation {
    module: Arc<Module>,
    target: BusId,
    state: OpState,
}

enum OpState {
    Oscillator(oscillator::OscillatorState),
    Scalar,
    Bandpass {
        source: BusId,
        state: bandpass::BiquadState,
    },
}

impl Operation {
    pub(crate) fn oscillator(module: Arc<Module>, target: BusId) -> Self {
        Self {
            module,
            target,
            state: OpState::Oscillator(oscillator::OscillatorState::default()),
        }
    }

    pub(crate) fn scalar(module: Arc<Module>, target: BusId) -> Self {
        Self {
            module,
            target,
            state: OpState::Scalar,
        }
    }

    pub(crate) fn bandpass(module: Arc<Module>, target: BusId, source: BusId) -> Self {
        Self {
            module,
            target,
            state: OpState::Bandpass {
                source,
                state: bandpass::BiquadState::default(),
            },
        }
    }

    pub fn module(&self) -> &Arc<Module> {
        &self.module
    }

    /// Bus this operation writes.
    pub fn target(&self) -> BusId {
        self.target
    }

    /// Process one block on the audio thread. Loads the parameter set
    /// once, so an edit landing mid-block is not observed until the next
    /// pass; no allocation, no locks, no failure path.
    pub(crate) fn process(&mut self, buses: &mut BusBank, sample_rate: f32) {
        let params = self.module.snapshot();
        match (&mut self.state, params.as_ref()) {
            (OpState::Oscillator(state), Params::Oscillator(p)) => {
                state.process(buses.samples_mut(self.target), p, sample_rate);
            }
            (OpState::Scalar, Params::Scalar(p)) => {
                scalar::process(buses.samples_mut(self.target), p);
            }
            (OpState::Bandpass { source, state }, Params::Bandpass(p)) => {
                let (out, input) = buses.write_read_pair(self.target, *source);
                state.process(out, input, p, sample_rate);
            }
            // A kind mismatch is excluded by construction: `Module::edit`
            // refuses a set of a different kind.
            _ => {}
        }
    }
}
