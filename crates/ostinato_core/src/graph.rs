//! Graph construction and the per-block processing pass.

use std::collections::HashMap;
use std::sync::Arc;

use crate::bus::{BusBank, BusId};
use crate::dsp::{BandpassParams, Operation, OscillatorParams, ScalarParams};
use crate::error::GraphError;
use crate::module::{Module, ModuleRegistry, Params};

/// Collects buses and operations and validates every structural
/// invariant before handing out a [`Graph`]:
///
/// - the block size is at least one frame,
/// - every referenced bus belongs to this graph,
/// - a bus has exactly one writer,
/// - an operation never reads the bus it writes,
/// - module addresses are unique.
///
/// A build failure is fatal configuration: the caller must not start
/// audio on a graph that did not build.
pub struct GraphBuilder {
    buses: BusBank,
    ops: Vec<Operation>,
    writers: HashMap<usize, String>,
    modules: HashMap<String, Arc<Module>>,
}

impl GraphBuilder {
    pub fn new(block_size: usize) -> Result<Self, GraphError> {
        Ok(Self {
            buses: BusBank::new(block_size)?,
            ops: Vec::new(),
            writers: HashMap::new(),
            modules: HashMap::new(),
        })
    }

    /// Allocate a named bus sized to one processing block.
    pub fn bus(&mut self, name: impl Into<String>) -> BusId {
        self.buses.allocate(name)
    }

    /// Add a periodic generator writing `target`.
    pub fn oscillator(
        &mut self,
        address: impl Into<String>,
        target: BusId,
        params: OscillatorParams,
    ) -> Result<Arc<Module>, GraphError> {
        self.add(address.into(), Params::Oscillator(params), target, None)
    }

    /// Add a constant-value source writing `target`.
    pub fn scalar(
        &mut self,
        address: impl Into<String>,
        target: BusId,
        params: ScalarParams,
    ) -> Result<Arc<Module>, GraphError> {
        self.add(address.into(), Params::Scalar(params), target, None)
    }

    /// Add a bandpass filter reading `source` and writing `target`.
    pub fn bandpass(
        &mut self,
        address: impl Into<String>,
        target: BusId,
        source: BusId,
        params: BandpassParams,
    ) -> Result<Arc<Module>, GraphError> {
        self.add(address.into(), Params::Bandpass(params), target, Some(source))
    }

    fn add(
        &mut self,
        address: String,
        params: Params,
        target: BusId,
        source: Option<BusId>,
    ) -> Result<Arc<Module>, GraphError> {
        if !self.buses.contains(target) {
            return Err(GraphError::UnknownBus(target.index()));
        }
        if let Some(source) = source {
            if !self.buses.contains(source) {
                return Err(GraphError::UnknownBus(source.index()));
            }
            if source == target {
                return Err(GraphError::SelfFeedback {
                    address,
                    bus: self.buses.name(target).to_string(),
                });
            }
        }
        if self.modules.contains_key(&address) {
            return Err(GraphError::DuplicateAddress(address));
        }
        if let Some(writer) = self.writers.get(&target.index()) {
            return Err(GraphError::BusAlreadyDriven {
                bus: self.buses.name(target).to_string(),
                writer: writer.clone(),
            });
        }

        let module = Arc::new(Module::new(address.clone(), params)?);
        let op = match module.snapshot().as_ref() {
            Params::Oscillator(_) => Operation::oscillator(module.clone(), target),
            Params::Scalar(_) => Operation::scalar(module.clone(), target),
            Params::Bandpass(_) => {
                // `source` is present for every path that builds bandpass params.
                Operation::bandpass(module.clone(), target, source.unwrap_or(target))
            }
        };

        self.writers.insert(target.index(), address.clone());
        self.modules.insert(address, module.clone());
        self.ops.push(op);
        Ok(module)
    }

    /// Finish construction. Operations run in insertion order, once per
    /// block.
    pub fn build(self) -> (Graph, ModuleRegistry) {
        (
            Graph {
                buses: self.buses,
                ops: self.ops,
            },
            ModuleRegistry::new(self.modules),
        )
    }
}

/// The runnable DSP graph: a bank of buses and an ordered list of
/// operations. Owned by the audio thread once the engine starts.
pub struct Graph {
    buses: BusBank,
    ops: Vec<Operation>,
}

impl Graph {
    /// Process one block: invoke each operation in graph order. Each
    /// reads its inputs from source buses and overwrites its target bus.
    /// Deterministic in (parameters, sample rate, private state); no
    /// allocation, no locks, no error paths.
    pub fn process_block(&mut self, sample_rate: f32) {
        for op in &mut self.ops {
            op.process(&mut self.buses, sample_rate);
        }
    }

    pub fn block_size(&self) -> usize {
        self.buses.block_size()
    }

    /// Read back the block most recently written to a bus.
    pub fn bus_samples(&self, id: BusId) -> &[f32] {
        self.buses.samples(id)
    }

    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.ops.iter()
    }
}
