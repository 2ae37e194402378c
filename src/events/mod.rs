//! Internal event bus.
//!
//! The refresh loop publishes a snapshot after each poll cycle; the queue
//! projection subscribes to it and publishes a lightweight "queue updated"
//! signal for push channels to fan out.

use tokio::sync::broadcast;

use crate::tracked::TrackedDownload;

/// Events published across the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A poll cycle finished; payload is the full current tracked set.
    TrackedDownloadsRefreshed(Vec<TrackedDownload>),
    /// The queue projection was rebuilt.
    QueueUpdated,
}

/// Broadcast bus for [`EngineEvent`]s.
///
/// Cloning shares the underlying channel. Events sent with no subscribers
/// are dropped silently.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: EngineEvent) {
        // Send fails only when there are no subscribers, which is fine.
        let _ = self.tx.send(event);
    }
}
