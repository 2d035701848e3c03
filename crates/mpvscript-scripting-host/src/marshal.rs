//! Property marshalling between script values and the host's typed formats.
//!
//! The raw entry points take a wire format code and validate it, plus the
//! value's tag, before anything reaches the host. A rejected call is logged at
//! error level through the host and yields `None`. The typed wrappers build a
//! correctly tagged value first, so only their coercion step can fail.

use mpvscript_client::{Node, PropertyFormat, PropertyValue};
use tracing::debug;

use crate::context::ScriptHandle;
use crate::error::BridgeError;

/// Validate a wire format code
pub fn format_from_code(code: i64) -> Result<PropertyFormat, BridgeError> {
    PropertyFormat::from_code(code).ok_or(BridgeError::InvalidFormat(code))
}

/// Integer coercion: flags count as 0/1, doubles truncate toward zero and
/// must fit in an `i64`, strings must parse as an integer.
pub fn coerce_int(value: &Node) -> Result<i64, BridgeError> {
    let fail = || BridgeError::Coercion {
        target: PropertyFormat::Int64,
        found: value.kind(),
    };
    match value {
        Node::Int64(i) => Ok(*i),
        Node::Flag(b) => Ok(i64::from(*b)),
        Node::Double(d) if (i64::MIN as f64..i64::MAX as f64).contains(&d.trunc()) => {
            Ok(d.trunc() as i64)
        }
        Node::String(s) => s.trim().parse().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

pub fn coerce_double(value: &Node) -> Result<f64, BridgeError> {
    let fail = || BridgeError::Coercion {
        target: PropertyFormat::Double,
        found: value.kind(),
    };
    match value {
        Node::Double(d) => Ok(*d),
        Node::Int64(i) => Ok(*i as f64),
        Node::Flag(b) => Ok(f64::from(u8::from(*b))),
        Node::String(s) => s.trim().parse().map_err(|_| fail()),
        _ => Err(fail()),
    }
}

impl ScriptHandle {
    fn reject<T>(&self, name: &str, err: BridgeError) -> Option<T> {
        debug!(target: "scripting", "Rejected property call for {}: {}", name, err);
        self.error(format!("property {}: {}", name, err));
        None
    }

    /// Set a property using a raw format code.
    ///
    /// Returns `None` when the code or the value's tag is invalid, otherwise
    /// whether the host accepted the write.
    pub fn set_property(&self, name: &str, format: i64, value: PropertyValue) -> Option<bool> {
        let expected = match format_from_code(format) {
            Ok(f) => f,
            Err(e) => return self.reject(name, e),
        };
        if value.format() != expected {
            return self.reject(
                name,
                BridgeError::FormatMismatch {
                    expected,
                    found: value.format(),
                },
            );
        }
        Some(self.write(name, &value))
    }

    /// Get a property using a raw format code; `None` on rejection or when
    /// the host has no value
    pub fn get_property(&self, name: &str, format: i64) -> Option<PropertyValue> {
        match format_from_code(format) {
            Ok(f) => self.read(name, f),
            Err(e) => self.reject(name, e),
        }
    }

    fn write(&self, name: &str, value: &PropertyValue) -> bool {
        match self.host().set_property(name, value) {
            Ok(()) => true,
            Err(e) => {
                debug!(target: "scripting", "set_property {} failed: {}", name, e);
                false
            }
        }
    }

    fn read(&self, name: &str, format: PropertyFormat) -> Option<PropertyValue> {
        match self.host().get_property(name, format) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(target: "scripting", "get_property {} failed: {}", name, e);
                None
            }
        }
    }

    pub fn del_property(&self, name: &str) -> bool {
        match self.host().del_property(name) {
            Ok(()) => true,
            Err(e) => {
                debug!(target: "scripting", "del_property {} failed: {}", name, e);
                false
            }
        }
    }

    // ===== Typed setters =====

    /// Any value is accepted and written in its string form
    pub fn set_property_string(&self, name: &str, value: impl Into<Node>) -> bool {
        self.write(name, &PropertyValue::String(value.into().to_string()))
    }

    pub fn set_property_osd(&self, name: &str, value: impl Into<Node>) -> bool {
        self.write(name, &PropertyValue::OsdString(value.into().to_string()))
    }

    /// Any value is accepted; its truthiness is what gets written
    pub fn set_property_bool(&self, name: &str, value: impl Into<Node>) -> bool {
        self.write(name, &PropertyValue::Flag(value.into().is_truthy()))
    }

    pub fn set_property_int(&self, name: &str, value: impl Into<Node>) -> Result<bool, BridgeError> {
        let value = coerce_int(&value.into())?;
        Ok(self.write(name, &PropertyValue::Int64(value)))
    }

    pub fn set_property_float(&self, name: &str, value: impl Into<Node>) -> Result<bool, BridgeError> {
        let value = coerce_double(&value.into())?;
        Ok(self.write(name, &PropertyValue::Double(value)))
    }

    pub fn set_property_node(&self, name: &str, value: impl Into<Node>) -> bool {
        self.write(name, &PropertyValue::Node(value.into()))
    }

    // ===== Typed getters =====

    pub fn get_property_string(&self, name: &str) -> Option<String> {
        self.read(name, PropertyFormat::String)
            .map(|v| v.into_node().to_string())
    }

    pub fn get_property_osd(&self, name: &str) -> Option<String> {
        self.read(name, PropertyFormat::OsdString)
            .map(|v| v.into_node().to_string())
    }

    /// A missing property reads as `false`
    pub fn get_property_bool(&self, name: &str) -> bool {
        self.read(name, PropertyFormat::Flag)
            .is_some_and(|v| v.into_node().is_truthy())
    }

    pub fn get_property_int(&self, name: &str) -> Option<i64> {
        self.read(name, PropertyFormat::Int64)
            .and_then(|v| coerce_int(&v.into_node()).ok())
    }

    pub fn get_property_float(&self, name: &str) -> Option<f64> {
        self.read(name, PropertyFormat::Double)
            .and_then(|v| coerce_double(&v.into_node()).ok())
    }

    pub fn get_property_node(&self, name: &str) -> Option<Node> {
        self.read(name, PropertyFormat::Node).map(PropertyValue::into_node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpvscript_client::{HostCall, LogLevel, MemoryHost};
    use mpvscript_events::ClientIdentity;
    use std::sync::Arc;

    fn handle() -> (Arc<MemoryHost>, ScriptHandle) {
        let host = Arc::new(MemoryHost::new());
        (host.clone(), ScriptHandle::new(ClientIdentity::new("m"), host))
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(&Node::from(7)).unwrap(), 7);
        assert_eq!(coerce_int(&Node::from(true)).unwrap(), 1);
        assert_eq!(coerce_int(&Node::from(-2.9)).unwrap(), -2);
        assert_eq!(coerce_int(&Node::from(" 42 ")).unwrap(), 42);
        assert!(coerce_int(&Node::from("1.5")).is_err());
        assert!(coerce_int(&Node::from(f64::NAN)).is_err());
        assert!(coerce_int(&Node::from(1e300)).is_err());
        assert!(coerce_int(&Node::from(-1e19)).is_err());
        assert!(coerce_int(&Node::from(i64::MAX as f64)).is_err());
        assert_eq!(coerce_int(&Node::from(i64::MIN as f64)).unwrap(), i64::MIN);
        assert!(matches!(
            coerce_int(&Node::None),
            Err(BridgeError::Coercion { found: "none", .. })
        ));
    }

    #[test]
    fn test_coerce_double() {
        assert_eq!(coerce_double(&Node::from(2)).unwrap(), 2.0);
        assert_eq!(coerce_double(&Node::from("0.25")).unwrap(), 0.25);
        assert_eq!(coerce_double(&Node::from(false)).unwrap(), 0.0);
        assert!(coerce_double(&Node::from("abc")).is_err());
        assert!(coerce_double(&Node::Array(vec![])).is_err());
    }

    #[test]
    fn test_raw_set_accepts_matching_format() {
        let (host, h) = handle();
        assert_eq!(h.set_property("volume", 4, PropertyValue::Int64(30)), Some(true));
        assert_eq!(host.property("volume"), Some(PropertyValue::Int64(30)));
    }

    #[test]
    fn test_raw_calls_reject_bad_codes_before_host() {
        let (host, h) = handle();
        for code in [0, 7, -1, 100] {
            assert_eq!(h.set_property("volume", code, PropertyValue::Int64(1)), None);
            assert_eq!(h.get_property("volume", code), None);
        }
        assert_eq!(host.property_call_count(), 0);
        assert_eq!(host.logs(LogLevel::Error).len(), 8);
    }

    #[test]
    fn test_raw_set_rejects_mismatched_tag() {
        let (host, h) = handle();
        assert_eq!(
            h.set_property("volume", 4, PropertyValue::String("30".into())),
            None
        );
        assert_eq!(host.property_call_count(), 0);
        assert_eq!(
            host.logs(LogLevel::Error),
            vec!["(m) property volume: value of format string does not match requested format int64"
                .to_string()]
        );
    }

    #[test]
    fn test_string_wrapper_stringifies() {
        let (host, h) = handle();
        assert!(h.set_property_string("title", 12));
        assert!(h.set_property_osd("osd", true));
        assert_eq!(host.property("title"), Some(PropertyValue::String("12".into())));
        assert_eq!(host.property("osd"), Some(PropertyValue::OsdString("yes".into())));
    }

    #[test]
    fn test_bool_wrapper_uses_truthiness() {
        let (host, h) = handle();
        h.set_property_bool("pause", "");
        assert_eq!(host.property("pause"), Some(PropertyValue::Flag(false)));
        h.set_property_bool("pause", 3);
        assert_eq!(host.property("pause"), Some(PropertyValue::Flag(true)));
    }

    #[test]
    fn test_numeric_wrappers_coerce_or_fail() {
        let (host, h) = handle();
        assert!(h.set_property_int("speed", "5").unwrap());
        assert!(h.set_property_float("volume", 40).unwrap());
        assert_eq!(host.property("speed"), Some(PropertyValue::Int64(5)));
        assert_eq!(host.property("volume"), Some(PropertyValue::Double(40.0)));

        host.clear_calls();
        assert!(h.set_property_int("speed", "fast").is_err());
        assert!(h.set_property_float("volume", Node::None).is_err());
        assert_eq!(host.property_call_count(), 0);
    }

    #[test]
    fn test_int_wrapper_rejects_out_of_range_doubles() {
        let (host, h) = handle();
        assert!(matches!(
            h.set_property_int("chapter", 1e300),
            Err(BridgeError::Coercion { target: PropertyFormat::Int64, .. })
        ));
        assert!(h.set_property_int("chapter", -1e19).is_err());
        assert_eq!(host.property("chapter"), None);
        assert_eq!(host.property_call_count(), 0);
    }

    #[test]
    fn test_node_wrapper_passes_through() {
        let (host, h) = handle();
        let node = Node::Array(vec![Node::from(1), Node::from("a")]);
        assert!(h.set_property_node("list", node.clone()));
        assert_eq!(host.calls(), vec![HostCall::SetProperty("list".into(), PropertyValue::Node(node.clone()))]);
        assert_eq!(h.get_property_node("list"), Some(node));
    }

    #[test]
    fn test_getters() {
        let host = Arc::new(
            MemoryHost::new()
                .with_property("pause", PropertyValue::Flag(true))
                .with_property("volume", PropertyValue::Double(55.5))
                .with_property("chapter", PropertyValue::Int64(3)),
        );
        let h = ScriptHandle::new(ClientIdentity::new("m"), host);
        assert!(h.get_property_bool("pause"));
        assert!(!h.get_property_bool("missing"));
        assert_eq!(h.get_property_float("volume"), Some(55.5));
        assert_eq!(h.get_property_int("chapter"), Some(3));
        assert_eq!(h.get_property_float("chapter"), Some(3.0));
        assert_eq!(h.get_property_string("chapter"), Some("3".into()));
        assert_eq!(h.get_property_int("missing"), None);
    }

    #[test]
    fn test_del_property() {
        let host = Arc::new(MemoryHost::new().with_property("user-data/x", PropertyValue::Int64(1)));
        let h = ScriptHandle::new(ClientIdentity::new("m"), host.clone());
        assert!(h.del_property("user-data/x"));
        assert!(!h.del_property("user-data/x"));
        assert_eq!(host.property("user-data/x"), None);
    }
}
