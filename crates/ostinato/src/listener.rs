//! Control-message listener: the boundary between an arbitrary external
//! message cadence and the module edit contract.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ostinato_core::{ModuleRegistry, Params};

use crate::error::{ControlError, EngineError};
use crate::sync::BlockSync;

/// A parsed edit request handed over by the external message source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMessage {
    /// Address of the module to edit.
    pub target: String,
    /// Replacement parameter set.
    pub edit: Params,
}

/// When received edits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Apply each message as soon as it is received.
    Immediate,
    /// Drain pending messages into a batch, observe one block boundary,
    /// then apply the whole batch. Bounds every edit's visibility to
    /// "no later than the start of the next block" without the audio
    /// thread ever waiting.
    #[default]
    NextBlock,
}

/// Serial dispatcher running on its own thread: one message is fully
/// handled before the next is accepted, so edits to a module are never
/// concurrent with themselves. Exits when every sender is gone.
pub struct ControlListener {
    handle: Option<JoinHandle<()>>,
}

impl ControlListener {
    pub fn spawn(
        rx: Receiver<ControlMessage>,
        registry: ModuleRegistry,
        sync: Arc<BlockSync>,
        mode: ApplyMode,
    ) -> Result<Self, EngineError> {
        let handle = thread::Builder::new()
            .name("control-listener".into())
            .spawn(move || run(rx, registry, sync, mode))?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the listener thread to finish. Callers must drop every
    /// control sender and close the rendezvous first.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    rx: Receiver<ControlMessage>,
    registry: ModuleRegistry,
    sync: Arc<BlockSync>,
    mode: ApplyMode,
) {
    while let Ok(message) = rx.recv() {
        match mode {
            ApplyMode::Immediate => apply(&registry, &message),
            ApplyMode::NextBlock => {
                let mut batch = vec![message];
                while let Ok(next) = rx.try_recv() {
                    batch.push(next);
                }
                // Once the rendezvous is closed there are no more block
                // boundaries to align to; apply what we have.
                let _ = sync.wait();
                for message in &batch {
                    apply(&registry, message);
                }
            }
        }
    }
    debug!("control channel closed, listener exiting");
}

fn apply(registry: &ModuleRegistry, message: &ControlMessage) {
    if let Err(err) = dispatch(registry, message) {
        warn!(address = %message.target, %err, "dropping control message");
    }
}

/// Resolve the target and apply the edit. An unknown address or a
/// rejected payload is a recoverable error: the message is dropped and
/// no module's parameters change.
pub fn dispatch(registry: &ModuleRegistry, message: &ControlMessage) -> Result<(), ControlError> {
    let module = registry
        .resolve(&message.target)
        .ok_or_else(|| ControlError::UnknownTarget(message.target.clone()))?;
    module
        .edit(message.edit.clone())
        .map_err(|source| ControlError::Rejected {
            address: message.target.clone(),
            source,
        })
}
