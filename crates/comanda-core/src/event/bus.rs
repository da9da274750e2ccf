//! Per-session broadcast of [`SessionEvent`]s.
//!
//! Each session owns one bus. Renderers subscribe after reading a snapshot
//! and apply the transitions that follow; a receiver that falls more than
//! `capacity` events behind gets `RecvError::Lagged` and should re-read the
//! snapshot.

use comanda_types::event::SessionEvent;
use tokio::sync::broadcast;
use tracing::trace;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receiver for every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Send `event` to current subscribers and return how many got it.
    /// With nobody listening the event is dropped.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let name = event.name();
        let delivered = self.sender.send(event).unwrap_or(0);
        trace!(event = name, delivered, "session event published");
        delivered
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
