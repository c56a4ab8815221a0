//! Runtime for the ostinato synthesis graph.
//!
//! Owns everything the core graph deliberately leaves out: the engine
//! context and its lifecycle, the block rendezvous between the audio
//! callback and the control thread, the control-message listener, and
//! the cpal output boundary.

pub mod config;
pub mod engine;
pub mod error;
pub mod listener;
mod output;
pub mod sync;

pub use config::EngineConfig;
pub use engine::{BlockRunner, Engine};
pub use error::{ControlError, EngineError};
pub use listener::{ApplyMode, ControlListener, ControlMessage};
pub use sync::BlockSync;

// The graph types the runtime API surfaces.
pub use ostinato_core::{
    BandpassParams, BusId, Graph, GraphBuilder, GraphError, ModuleRegistry, OscillatorParams,
    Params, ScalarParams, Waveform,
};
