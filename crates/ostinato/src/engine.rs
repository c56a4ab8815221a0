//! The owned engine context and its lifecycle.

use std::sync::Arc;

use crossbeam_channel::{Sender, unbounded};
use tracing::info;

use ostinato_core::{BusId, Graph, ModuleRegistry};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::listener::{ApplyMode, ControlListener, ControlMessage};
use crate::output;
use crate::sync::BlockSync;

/// Drives the graph one block at a time and broadcasts the rendezvous
/// after each completed pass. This is the single entry point the
/// audio-device boundary invokes, and the sample rate is the single
/// value it consumes from that boundary.
pub struct BlockRunner {
    graph: Graph,
    out: BusId,
    sync: Arc<BlockSync>,
    sample_rate: f32,
}

impl BlockRunner {
    pub fn new(graph: Graph, out: BusId, sync: Arc<BlockSync>, sample_rate: f32) -> Self {
        Self {
            graph,
            out,
            sync,
            sample_rate,
        }
    }

    /// Process one block, then signal "block complete". Runs on the
    /// audio callback thread; bounded time, no locks held across work.
    pub fn process_block(&mut self) {
        self.graph.process_block(self.sample_rate);
        self.sync.signal();
    }

    /// Samples rendered by the most recent [`process_block`](Self::process_block).
    pub fn output(&self) -> &[f32] {
        self.graph.bus_samples(self.out)
    }

    pub fn block_size(&self) -> usize {
        self.graph.block_size()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Explicitly owned engine context: configuration, module registry,
/// rendezvous, control listener, and (once started) the output stream.
/// There is no global state; everything is torn down by [`shutdown`](Self::shutdown).
pub struct Engine {
    config: EngineConfig,
    registry: ModuleRegistry,
    sync: Arc<BlockSync>,
    control_tx: Sender<ControlMessage>,
    listener: Option<ControlListener>,
    runner: Option<BlockRunner>,
    stream: Option<cpal::Stream>,
}

impl Engine {
    /// Assemble a fully constructed engine: graph, registry, rendezvous,
    /// and listener all live before any audio callback exists. `out` is
    /// the bus fed to the output device.
    pub fn new(
        config: EngineConfig,
        graph: Graph,
        registry: ModuleRegistry,
        out: BusId,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        if graph.block_size() != config.block_size {
            return Err(EngineError::InvalidConfig(
                "graph block size does not match engine configuration",
            ));
        }

        let sync = Arc::new(BlockSync::new());
        let (control_tx, control_rx) = unbounded();
        let listener = ControlListener::spawn(
            control_rx,
            registry.clone(),
            sync.clone(),
            ApplyMode::NextBlock,
        )?;
        let runner = BlockRunner::new(graph, out, sync.clone(), config.sample_rate as f32);

        Ok(Self {
            config,
            registry,
            sync,
            control_tx,
            listener: Some(listener),
            runner: Some(runner),
            stream: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn sync(&self) -> &Arc<BlockSync> {
        &self.sync
    }

    /// Sender handed to the external message-receiving collaborator.
    /// Every clone must be dropped before [`shutdown`](Self::shutdown)
    /// can join the listener.
    pub fn control_sender(&self) -> Sender<ControlMessage> {
        self.control_tx.clone()
    }

    /// Take the block runner to drive blocks without an audio device
    /// (offline rendering and tests). After this, [`start`](Self::start)
    /// has nothing to run and will fail.
    pub fn take_runner(&mut self) -> Option<BlockRunner> {
        self.runner.take()
    }

    /// Open the default output device and register the callback. The
    /// graph moves into the callback; from here on the audio thread owns
    /// it.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let runner = self
            .runner
            .take()
            .ok_or(EngineError::InvalidConfig("block runner already taken"))?;
        let stream = output::start_output(&self.config, runner)?;
        info!(
            sample_rate = self.config.sample_rate,
            block_size = self.config.block_size,
            modules = self.registry.len(),
            "audio output started"
        );
        self.stream = Some(stream);
        Ok(())
    }

    /// Tear down in order: unregister the audio callback (dropping the
    /// stream also releases the graph it owns), then unblock rendezvous
    /// waiters, then stop the listener. No processing call can observe a
    /// torn-down graph, and the listener is never joined while parked in
    /// a wait that would not be signaled again.
    pub fn shutdown(self) {
        let Engine {
            stream,
            runner,
            sync,
            control_tx,
            listener,
            ..
        } = self;
        drop(stream);
        drop(runner);
        sync.close();
        drop(control_tx);
        if let Some(listener) = listener {
            listener.join();
        }
        info!("engine stopped");
    }
}
