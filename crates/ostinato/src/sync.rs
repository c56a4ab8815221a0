//! Rendezvous between the audio callback and the control thread.

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct SyncState {
    /// Monotonic count of completed blocks. Checked under the same
    /// mutex the condvar waits on, so a waiter verifies the counter
    /// actually advanced instead of trusting the wakeup alone.
    generation: u64,
    closed: bool,
}

/// Signal/wait pairing that aligns control-thread work to block
/// boundaries.
///
/// Roles:
/// - the audio callback calls [`signal`](BlockSync::signal) after each
///   completed pass over the graph. It never waits for a waiter to be
///   present; a broadcast with no waiters is a no-op.
/// - a waiter calls [`wait`](BlockSync::wait) and is released by the
///   next broadcast, never an earlier one. A waiter arriving between
///   broadcasts is caught by the next; spurious wakeups re-check the
///   generation counter and go back to sleep.
///
/// This is phase alignment, not mutual exclusion: the mutex is held only
/// long enough to read or bump the counter, so the signaler is never
/// blocked behind control-thread work.
pub struct BlockSync {
    state: Mutex<SyncState>,
    block_done: Condvar,
}

impl BlockSync {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SyncState::default()),
            block_done: Condvar::new(),
        }
    }

    /// Audio-thread side: mark one block complete and wake every waiter.
    pub fn signal(&self) {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        self.block_done.notify_all();
    }

    /// Count of blocks signaled so far.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Block until the next signal. Returns the generation observed on
    /// wake, or `None` once the primitive is closed (no more block
    /// boundaries will ever arrive).
    pub fn wait(&self) -> Option<u64> {
        let mut state = self.state.lock();
        let seen = state.generation;
        while state.generation == seen && !state.closed {
            self.block_done.wait(&mut state);
        }
        (state.generation != seen).then_some(state.generation)
    }

    /// Shutdown path: wake every waiter and refuse future waits. Called
    /// after the audio callback is unregistered, so the listener can be
    /// joined without hanging in a wait that would never be signaled.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.block_done.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Default for BlockSync {
    fn default() -> Self {
        Self::new()
    }
}
