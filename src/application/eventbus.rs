//! In-process fan-out of group events.
//!
//! Delivery is best-effort. A listener that falls more than the channel
//! capacity behind loses the oldest events and keeps going.

use crate::domain::event::DomainEvent;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

const DEFAULT_CAPACITY: usize = 64;

pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of listeners the event reached.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let name = event.event_name();
        match self.sender.send(event) {
            Ok(listeners) => {
                tracing::debug!(event = name, listeners, "Published event");
                listeners
            }
            Err(_) => {
                tracing::trace!(event = name, "Event dropped, nobody is listening");
                0
            }
        }
    }

    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::default())
}

/// Listener handle. Lagging skips ahead instead of failing.
pub struct EventStream {
    receiver: broadcast::Receiver<DomainEvent>,
}

impl EventStream {
    /// Wait for the next event. `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event listener lagged, skipping ahead");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next event if one is already queued.
    pub fn try_next(&mut self) -> Option<DomainEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event listener lagged, skipping ahead");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
