use std::path::PathBuf;

use bitflags::bitflags;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

use crate::node::Node;
use crate::property::{PropertyFormat, PropertyValue};

/// Errors reported by the host when a boundary call fails
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("host error {code}: {message}")]
    Call { code: i32, message: String },

    #[error("property unavailable: {0}")]
    PropertyUnavailable(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unsupported request: {0}")]
    Unsupported(String),
}

/// Host log levels available to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fatal" => Some(LogLevel::Fatal),
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

bitflags! {
    /// Activation flags for input sections
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputFlags: u32 {
        /// Keys not bound in this section are not looked up in other
        /// sections; the host reports them as unbound instead.
        const EXCLUSIVE = 1;
        /// Prefer this section to other sections.
        const ON_TOP = 2;
        /// Allow window dragging even inside the mouse area.
        const ALLOW_VO_DRAGGING = 4;
        /// Do not force the mouse pointer visible inside the mouse area.
        const ALLOW_HIDE_CURSOR = 8;
    }
}

/// A named group of key bindings in the host's input configuration syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSection {
    pub name: String,
    pub location: String,
    /// One `<key> <command>` line per binding, already in final order
    pub lines: Vec<String>,
    /// Builtin sections supply defaults that user bindings may override
    pub builtin: bool,
    pub owner: String,
}

impl InputSection {
    /// Section body as handed to the host: a leading newline, then one line per binding
    pub fn contents(&self) -> String {
        format!("\n{}", self.lines.join("\n"))
    }
}

/// The player host, as seen by the scripting bridge.
///
/// Every call is synchronous. Implementations are expected to be cheap
/// handles; the bridge never holds a lock across a host call.
pub trait Host: Send + Sync {
    /// Write a message to the host log
    fn log_message(&self, level: LogLevel, text: &str);

    /// Run a command given as a list of arguments, the first being the command name
    fn command(&self, args: &[String]) -> Result<(), HostError>;

    /// Run a command given in the host's input.conf syntax
    fn command_string(&self, command: &str) -> Result<(), HostError>;

    /// Run a command given as a structured node and return its result
    fn command_node(&self, command: &Node) -> Result<Node, HostError>;

    fn get_property(&self, name: &str, format: PropertyFormat) -> Result<PropertyValue, HostError>;

    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<(), HostError>;

    fn del_property(&self, name: &str) -> Result<(), HostError>;

    fn define_input_section(&self, section: &InputSection);

    fn enable_input_section(&self, name: &str, flags: InputFlags);

    /// Enable or disable delivery of an event id to this client
    fn request_event(&self, event_id: i32, enable: bool) -> Result<(), HostError>;

    /// Subscribe to host log messages at the given level
    fn enable_messages(&self, level: &str) -> Result<(), HostError>;

    fn find_config_file(&self, filename: &str) -> Option<PathBuf>;

    /// Whether the scripting extension is available in this host
    fn extension_ok(&self) -> bool {
        true
    }
}
