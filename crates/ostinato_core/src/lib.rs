//! Synthesis graph core
//!
//! This crate provides the DSP graph for a real-time synthesis engine:
//! buses carrying one audio-rate signal each, modules owning editable
//! parameter sets, and per-block operations composed into a [`Graph`].
//! It is a pure library with no I/O or threading concerns. The audio
//! device boundary, control-message listener, and block rendezvous live
//! in the runtime crate.

pub mod bus;
pub mod dsp;
pub mod error;
pub mod graph;
pub mod module;

// Re-export commonly used items
pub use bus::{Bus, BusBank, BusId};
pub use dsp::{BandpassParams, OscillatorParams, ScalarParams, Waveform};
pub use error::GraphError;
pub use graph::{Graph, GraphBuilder};
pub use module::{Module, ModuleKind, ModuleRegistry, Params};
