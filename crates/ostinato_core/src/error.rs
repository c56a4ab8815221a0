use thiserror::Error;

use crate::module::ModuleKind;

/// Errors raised while constructing a graph or validating parameters.
///
/// Every variant is a configuration error: each is only reachable before
/// the audio callback is registered (graph build) or on the control
/// thread (a rejected edit). The per-block processing path has no error
/// type at all; everything that could fail there is excluded here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("block size must be at least one frame")]
    InvalidBlockSize,

    #[error("bus #{0} does not belong to this graph")]
    UnknownBus(usize),

    #[error("bus `{bus}` is already written by `{writer}`")]
    BusAlreadyDriven { bus: String, writer: String },

    #[error("operation `{address}` cannot read the bus it writes (`{bus}`)")]
    SelfFeedback { address: String, bus: String },

    #[error("a module is already registered at address `{0}`")]
    DuplicateAddress(String),

    #[error("parameter `{field}` has unsupported value {value}")]
    InvalidParameter { field: &'static str, value: f32 },

    #[error("module `{address}` is a {expected}, edit carried {found} parameters")]
    KindMismatch {
        address: String,
        expected: ModuleKind,
        found: ModuleKind,
    },
}
