use strum_macros::{Display, IntoStaticStr};

use crate::node::Node;

/// Value formats of the host property protocol.
///
/// The integer codes are part of the host wire contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
#[repr(i32)]
pub enum PropertyFormat {
    String = 1,
    OsdString = 2,
    Flag = 3,
    Int64 = 4,
    Double = 5,
    Node = 6,
}

impl PropertyFormat {
    pub const ALL: [PropertyFormat; 6] = [
        PropertyFormat::String,
        PropertyFormat::OsdString,
        PropertyFormat::Flag,
        PropertyFormat::Int64,
        PropertyFormat::Double,
        PropertyFormat::Node,
    ];

    /// Convert a wire code to a format; anything outside 1..=6 is rejected
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(PropertyFormat::String),
            2 => Some(PropertyFormat::OsdString),
            3 => Some(PropertyFormat::Flag),
            4 => Some(PropertyFormat::Int64),
            5 => Some(PropertyFormat::Double),
            6 => Some(PropertyFormat::Node),
            _ => None,
        }
    }

    /// Get the wire code for this format
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// A property value tagged with its format
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    OsdString(String),
    Flag(bool),
    Int64(i64),
    Double(f64),
    Node(Node),
}

impl PropertyValue {
    pub fn format(&self) -> PropertyFormat {
        match self {
            PropertyValue::String(_) => PropertyFormat::String,
            PropertyValue::OsdString(_) => PropertyFormat::OsdString,
            PropertyValue::Flag(_) => PropertyFormat::Flag,
            PropertyValue::Int64(_) => PropertyFormat::Int64,
            PropertyValue::Double(_) => PropertyFormat::Double,
            PropertyValue::Node(_) => PropertyFormat::Node,
        }
    }

    /// Flag values cross the boundary as 0 or 1
    pub fn flag_code(&self) -> Option<i32> {
        match self {
            PropertyValue::Flag(b) => Some(i32::from(*b)),
            _ => None,
        }
    }

    pub fn into_node(self) -> Node {
        match self {
            PropertyValue::String(s) | PropertyValue::OsdString(s) => Node::String(s),
            PropertyValue::Flag(b) => Node::Flag(b),
            PropertyValue::Int64(i) => Node::Int64(i),
            PropertyValue::Double(d) => Node::Double(d),
            PropertyValue::Node(node) => node,
        }
    }
}
