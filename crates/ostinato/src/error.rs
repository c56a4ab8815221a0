use thiserror::Error;

use ostinato_core::GraphError;

/// Fatal startup errors. Any of these aborts before the audio callback
/// is registered; the engine never enters real-time operation in a
/// partially built state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("unsupported output sample format: {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("failed to query device configuration: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to spawn control listener thread: {0}")]
    SpawnListener(#[from] std::io::Error),
}

/// Recoverable control-path errors: the offending message is logged and
/// dropped, the engine keeps running on its current parameter state, and
/// nothing propagates to the audio path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("no module registered at address `{0}`")]
    UnknownTarget(String),

    #[error("edit rejected for `{address}`: {source}")]
    Rejected { address: String, source: GraphError },
}
