//! Modules: the externally addressable units a control message targets.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::dsp::{BandpassParams, OscillatorParams, ScalarParams};
use crate::error::GraphError;

/// Closed set of operation kinds. The graph dispatches over this tag
/// instead of open-ended function pointers, so the scheduler stays
/// homogeneous over node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleKind {
    Oscillator,
    Scalar,
    Bandpass,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Oscillator => write!(f, "oscillator"),
            ModuleKind::Scalar => write!(f, "scalar"),
            ModuleKind::Bandpass => write!(f, "bandpass"),
        }
    }
}

/// A module's full parameter set, one variant per kind.
///
/// An edit replaces the whole set at once; fields are never written
/// individually, so a reader can never observe a half-updated set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Params {
    Oscillator(OscillatorParams),
    Scalar(ScalarParams),
    Bandpass(BandpassParams),
}

impl Params {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Params::Oscillator(_) => ModuleKind::Oscillator,
            Params::Scalar(_) => ModuleKind::Scalar,
            Params::Bandpass(_) => ModuleKind::Bandpass,
        }
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        match self {
            Params::Oscillator(p) => p.validate(),
            Params::Scalar(p) => p.validate(),
            Params::Bandpass(p) => p.validate(),
        }
    }
}

/// An addressable graph node owning its parameter set.
///
/// The parameter set lives behind an [`ArcSwap`]: the control listener is
/// its single writer (`edit`), the audio thread its single reader
/// (`snapshot`, once per block). The audio thread never takes a lock for
/// it, and an edit becomes visible exactly at a block boundary because
/// the operation holds the loaded set for the whole block.
#[derive(Debug)]
pub struct Module {
    address: String,
    params: ArcSwap<Params>,
}

impl Module {
    /// Validates the initial parameters; an invalid set is a fatal
    /// configuration error and the module must not enter a graph.
    pub fn new(address: impl Into<String>, params: Params) -> Result<Self, GraphError> {
        params.validate()?;
        Ok(Self {
            address: address.into(),
            params: ArcSwap::from_pointee(params),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn kind(&self) -> ModuleKind {
        self.params.load().kind()
    }

    /// Load the current parameter set.
    pub fn snapshot(&self) -> Arc<Params> {
        self.params.load_full()
    }

    /// Replace the parameter set wholesale. Called only by the control
    /// listener, one message at a time. Rejects a set of a different
    /// kind or with out-of-range values, leaving the current set intact.
    pub fn edit(&self, params: Params) -> Result<(), GraphError> {
        params.validate()?;
        let expected = self.kind();
        if params.kind() != expected {
            return Err(GraphError::KindMismatch {
                address: self.address.clone(),
                expected,
                found: params.kind(),
            });
        }
        self.params.store(Arc::new(params));
        Ok(())
    }
}

/// Immutable address → module map, built once at graph construction and
/// shared with the control listener.
#[derive(Clone)]
pub struct ModuleRegistry {
    modules: Arc<HashMap<String, Arc<Module>>>,
}

impl ModuleRegistry {
    pub(crate) fn new(modules: HashMap<String, Arc<Module>>) -> Self {
        Self {
            modules: Arc::new(modules),
        }
    }

    pub fn resolve(&self, address: &str) -> Option<Arc<Module>> {
        self.modules.get(address).cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }
}
