/// Host event types for mpvscript
///
/// This crate provides the event vocabulary shared by the bridge and the
/// runner: host event ids, the raw event envelope, and the decoded form of
/// client messages used to invoke script callbacks.
use mpvscript_client::Node;

pub mod client_message;
pub mod event_id;
pub mod identity;

pub use client_message::{ClientMessage, DecodeError};
pub use event_id::EventId;
pub use identity::{ClientIdentity, CompoundKey, SEPARATOR};

/// A raw event as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// Host event id; may be an id this crate does not know
    pub id: i32,
    pub data: Node,
}

impl HostEvent {
    pub fn new(id: i32, data: Node) -> Self {
        Self { id, data }
    }

    /// Build an event from a known id
    pub fn known(id: EventId, data: Node) -> Self {
        Self::new(id.to_discriminant(), data)
    }

    pub fn event_id(&self) -> Option<EventId> {
        EventId::from_discriminant(self.id)
    }

    pub fn is(&self, id: EventId) -> bool {
        self.id == id.to_discriminant()
    }

    /// A client message as the host sends it for a script key binding
    pub fn key_binding(key: &CompoundKey, state: &str) -> Self {
        Self::known(
            EventId::ClientMessage,
            Node::Array(vec![
                Node::from("key-binding"),
                Node::String(key.encode()),
                Node::from(state),
            ]),
        )
    }

    pub fn shutdown() -> Self {
        Self::known(EventId::Shutdown, Node::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_event_roundtrip() {
        let event = HostEvent::known(EventId::Seek, Node::None);
        assert_eq!(event.id, 20);
        assert_eq!(event.event_id(), Some(EventId::Seek));
        assert!(event.is(EventId::Seek));
        assert!(!event.is(EventId::ClientMessage));
    }

    #[test]
    fn test_unknown_event_id() {
        let event = HostEvent::new(99, Node::None);
        assert_eq!(event.event_id(), None);
    }

    #[test]
    fn test_key_binding_payload_layout() {
        let key = CompoundKey::new(ClientIdentity::new("demo"), "toggle");
        let event = HostEvent::key_binding(&key, "u-");
        assert!(event.is(EventId::ClientMessage));
        assert_eq!(event.data.get(1).and_then(Node::as_str), Some("demo___toggle"));
        assert_eq!(event.data.get(2).and_then(Node::as_str), Some("u-"));
    }
}
