// Event bus: one broadcast channel from the host side to every script instance

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;

use mpvscript_events::HostEvent;

/// Source of the event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Delivered by the player host
    Host,
    /// Synthesized by the runner itself, e.g. the shutdown on close
    Runner,
}

/// Complete event envelope
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub event: HostEvent,
    /// Position of this event on the bus, starting at 1
    pub sequence: u64,
    pub timestamp: Instant,
    pub source: EventSource,
}

/// Event sender the host side uses to publish events
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: broadcast::Sender<EventEnvelope>,
    sequence: Arc<AtomicU64>,
    source: EventSource,
}

impl EventSender {
    /// Publish an event; returns how many instances will see it
    pub fn publish(&self, event: HostEvent) -> usize {
        let envelope = EventEnvelope {
            event,
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp: Instant::now(),
            source: self.source,
        };
        self.sender.send(envelope).unwrap_or(0)
    }

    pub fn source(&self) -> EventSource {
        self.source
    }
}

/// Central event bus that manages event distribution
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn create_sender(&self, source: EventSource) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
            sequence: self.sequence.clone(),
            source,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
