//! Decoding of client-message events into structured callback requests.

use mpvscript_client::Node;
use thiserror::Error;

use crate::identity::CompoundKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("client message payload is not a list")]
    NotAList,

    #[error("client message has no target element")]
    MissingTarget,

    #[error("client message target {0:?} has no client separator")]
    MissingSeparator(String),
}

/// A decoded client message: `[kind, "<client>___<name>", state, args...]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientMessage {
    pub target: CompoundKey,
    key_up: bool,
}

impl ClientMessage {
    pub fn decode(payload: &Node) -> Result<Self, DecodeError> {
        let items = payload.as_array().ok_or(DecodeError::NotAList)?;

        let raw_target = items
            .get(1)
            .and_then(Node::as_str)
            .ok_or(DecodeError::MissingTarget)?;
        let target = CompoundKey::parse(raw_target)
            .ok_or_else(|| DecodeError::MissingSeparator(raw_target.to_string()))?;

        let key_up = items
            .get(2)
            .and_then(Node::as_str)
            .is_some_and(|state| state.starts_with('u'));

        Ok(Self { target, key_up })
    }

    /// Only a key release fires the bound callback
    pub fn triggers(&self) -> bool {
        self.key_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ClientIdentity;

    fn payload(items: &[&str]) -> Node {
        Node::Array(items.iter().map(|s| Node::from(*s)).collect())
    }

    #[test]
    fn test_decode_key_up() {
        let msg = ClientMessage::decode(&payload(&["key-binding", "demo___toggle", "u-"])).unwrap();
        assert_eq!(msg.target.client, ClientIdentity::new("demo"));
        assert_eq!(msg.target.name, "toggle");
        assert!(msg.triggers());
    }

    #[test]
    fn test_other_states_do_not_trigger() {
        for state in ["d-", "r-", "p-", "", "U"] {
            let msg = ClientMessage::decode(&payload(&["key-binding", "demo___toggle", state])).unwrap();
            assert!(!msg.triggers(), "state {:?}", state);
        }
    }

    #[test]
    fn test_decode_missing_state() {
        let msg = ClientMessage::decode(&payload(&["key-binding", "demo___toggle"])).unwrap();
        assert!(!msg.triggers());
    }

    #[test]
    fn test_decode_ignores_extra_elements() {
        let msg =
            ClientMessage::decode(&payload(&["key-binding", "demo___x", "u-", "a", "b"])).unwrap();
        assert_eq!(msg.target.name, "x");
        assert!(msg.triggers());
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            ClientMessage::decode(&Node::from("flat")),
            Err(DecodeError::NotAList)
        );
        assert_eq!(
            ClientMessage::decode(&payload(&["key-binding"])),
            Err(DecodeError::MissingTarget)
        );
        assert_eq!(
            ClientMessage::decode(&payload(&["key-binding", "plain"])),
            Err(DecodeError::MissingSeparator("plain".into()))
        );
    }
}
