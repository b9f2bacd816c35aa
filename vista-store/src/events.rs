use tokio::sync::broadcast;
use tracing::{debug, error, info};

use vista_shared::DomainEvent;

const DEFAULT_CAPACITY: usize = 256;

/// In-process event bus. Every event is logged with its topic and key, then
/// fanned out to whoever subscribed; having no subscribers is not an error.
#[derive(Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DomainEvent) {
        let topic = event.topic();
        let key = event.key();

        match serde_json::to_string(&event) {
            Ok(payload) => info!(topic, key = %key, payload = %payload, "Event published"),
            Err(e) => error!(topic, key = %key, "Failed to serialize event: {}", e),
        }

        if self.sender.send(event).is_err() {
            debug!(topic, "No event subscribers");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
