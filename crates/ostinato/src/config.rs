use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Engine configuration. Validated before anything real-time exists;
/// a bad value here aborts startup, never the running callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Sample rate requested from the output device, in Hz.
    pub sample_rate: u32,
    /// Frames per processing block.
    pub block_size: usize,
    /// Output channels requested from the device. The mono graph output
    /// is broadcast across all of them.
    pub channels: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            block_size: 128,
            channels: 2,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidConfig("sample rate must be positive"));
        }
        if self.block_size == 0 {
            return Err(EngineError::InvalidConfig(
                "block size must be at least one frame",
            ));
        }
        if self.channels == 0 {
            return Err(EngineError::InvalidConfig(
                "at least one output channel is required",
            ));
        }
        Ok(())
    }
}
