use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// A control-rate value broadcast at audio rate: every frame of the
/// target bus gets the same value. Edits land at block boundaries, never
/// mid-block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalarParams {
    pub value: f32,
}

impl ScalarParams {
    pub(crate) fn validate(&self) -> Result<(), GraphError> {
        if !self.value.is_finite() {
            return Err(GraphError::InvalidParameter {
                field: "value",
                value: self.value,
            });
        }
        Ok(())
    }
}

pub(crate) fn process(out: &mut [f32], params: &ScalarParams) {
    out.fill(params.value);
}
