use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Generic structured value, mirroring the host's node format
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    #[default]
    None,
    Flag(bool),
    Int64(i64),
    Double(f64),
    String(String),
    Array(Vec<Node>),
    Map(BTreeMap<String, Node>),
}

impl Node {
    /// Truthiness as scripts understand it: empty and zero values are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::None => false,
            Node::Flag(b) => *b,
            Node::Int64(i) => *i != 0,
            Node::Double(d) => *d != 0.0,
            Node::String(s) => !s.is_empty(),
            Node::Array(items) => !items.is_empty(),
            Node::Map(map) => !map.is_empty(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Node::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Index into an array node
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Node::None => "none",
            Node::Flag(_) => "flag",
            Node::Int64(_) => "int64",
            Node::Double(_) => "double",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Map(_) => "map",
        }
    }
}

/// Renders the node the way the host parses string-formatted values:
/// flags become `yes`/`no`, containers use a JSON-like layout.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::None => Ok(()),
            Node::Flag(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            Node::Int64(i) => write!(f, "{}", i),
            Node::Double(d) => write!(f, "{}", d),
            Node::String(s) => write!(f, "{}", s),
            Node::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write_nested(f, item)?;
                }
                write!(f, "]")
            }
            Node::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{:?}:", key)?;
                    write_nested(f, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn write_nested(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    match node {
        Node::None => write!(f, "null"),
        Node::Flag(b) => write!(f, "{}", b),
        Node::String(s) => write!(f, "{:?}", s),
        other => write!(f, "{}", other),
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Flag(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int64(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int64(value.into())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Double(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Array(value)
    }
}

impl From<BTreeMap<String, Node>> for Node {
    fn from(value: BTreeMap<String, Node>) -> Self {
        Node::Map(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Node::None)
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Node::String(s),
            toml::Value::Integer(i) => Node::Int64(i),
            toml::Value::Float(f) => Node::Double(f),
            toml::Value::Boolean(b) => Node::Flag(b),
            toml::Value::Datetime(dt) => Node::String(dt.to_string()),
            toml::Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            toml::Value::Table(table) => Node::Map(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}
