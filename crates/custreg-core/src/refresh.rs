//! Refresh signal between the registration workflow and the list loader.
//!
//! A monotonically increasing generation counter paired with an unbounded
//! channel. Every `fire()` produces exactly one [`RefreshEvent`]; events are
//! never coalesced, so two back-to-back fires lead to two reloads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A change notification carrying the generation it was fired at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshEvent {
    pub generation: u64,
}

/// Constructor namespace for the trigger/listener pair.
pub struct RefreshSignal;

impl RefreshSignal {
    /// Creates a connected trigger and listener, starting at generation 0.
    pub fn channel() -> (RefreshTrigger, RefreshListener) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let trigger = RefreshTrigger {
            generation: Arc::new(AtomicU64::new(0)),
            sender,
        };
        (trigger, RefreshListener { receiver })
    }
}

/// Sending half. Cloneable; all clones share one counter.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    generation: Arc<AtomicU64>,
    sender: mpsc::UnboundedSender<RefreshEvent>,
}

impl RefreshTrigger {
    /// Increments the generation and notifies the listener.
    ///
    /// Returns the new generation. If the listener is gone the counter still
    /// advances and nothing is delivered.
    pub fn fire(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if self.sender.send(RefreshEvent { generation }).is_err() {
            tracing::debug!(generation, "refresh listener dropped; event discarded");
        }
        generation
    }

    /// Current generation without firing.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

/// Receiving half, owned by the list loader.
#[derive(Debug)]
pub struct RefreshListener {
    receiver: mpsc::UnboundedReceiver<RefreshEvent>,
}

impl RefreshListener {
    /// Waits for the next event. `None` once every trigger is dropped.
    pub async fn recv(&mut self) -> Option<RefreshEvent> {
        self.receiver.recv().await
    }

    /// Returns an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<RefreshEvent> {
        self.receiver.try_recv().ok()
    }
}
