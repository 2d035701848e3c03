use std::collections::HashMap;

use mpvscript_client::PropertyFormat;
use mpvscript_events::{ClientIdentity, CompoundKey};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedProperty {
    pub key: CompoundKey,
    pub reply_token: u64,
    pub format: PropertyFormat,
}

/// Properties a client has asked to observe, keyed by `<identity>___<name>`.
/// Observing the same property again replaces the earlier record.
#[derive(Debug)]
pub struct ObservationTable {
    identity: ClientIdentity,
    entries: HashMap<CompoundKey, ObservedProperty>,
}

impl ObservationTable {
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            entries: HashMap::new(),
        }
    }

    pub fn observe(&mut self, name: &str, format: PropertyFormat, reply_token: u64) -> &ObservedProperty {
        let key = CompoundKey::new(self.identity.clone(), name);
        debug!(target: "scripting", "Observing {} as {}", key, format);
        let entry = ObservedProperty {
            key: key.clone(),
            reply_token,
            format,
        };
        self.entries.entry(key).insert_entry(entry).into_mut()
    }

    pub fn get(&self, name: &str) -> Option<&ObservedProperty> {
        self.entries
            .get(&CompoundKey::new(self.identity.clone(), name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObservedProperty> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_keys_by_identity() {
        let mut table = ObservationTable::new(ClientIdentity::new("demo"));
        let entry = table.observe("pause", PropertyFormat::Flag, 0);
        assert_eq!(entry.key.encode(), "demo___pause");
        assert_eq!(entry.reply_token, 0);
    }

    #[test]
    fn test_reobserve_overwrites() {
        let mut table = ObservationTable::new(ClientIdentity::new("demo"));
        table.observe("volume", PropertyFormat::Int64, 1);
        let returned = table.observe("volume", PropertyFormat::Double, 9);
        assert_eq!(returned.format, PropertyFormat::Double);
        assert_eq!(returned.reply_token, 9);
        assert_eq!(table.len(), 1);
        let entry = table.get("volume").unwrap();
        assert_eq!(entry.format, PropertyFormat::Double);
        assert_eq!(entry.reply_token, 9);
    }

    #[test]
    fn test_unknown_property() {
        let table = ObservationTable::new(ClientIdentity::new("demo"));
        assert!(table.get("pause").is_none());
        assert!(table.is_empty());
    }
}
