//! In-memory host used for dry runs and tests.
//!
//! Properties live in a map, input sections and commands are recorded, and
//! log messages are forwarded to `tracing`. Every boundary call is kept in
//! order so callers can assert on exactly what crossed the boundary.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::host::{Host, HostError, InputFlags, InputSection, LogLevel};
use crate::node::Node;
use crate::property::{PropertyFormat, PropertyValue};

/// One recorded boundary call
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Log(LogLevel, String),
    Command(Vec<String>),
    CommandString(String),
    CommandNode(Node),
    GetProperty(String, PropertyFormat),
    SetProperty(String, PropertyValue),
    DelProperty(String),
    DefineSection(InputSection),
    EnableSection(String, InputFlags),
    RequestEvent(i32, bool),
    EnableMessages(String),
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    calls: Mutex<Vec<HostCall>>,
    properties: Mutex<HashMap<String, PropertyValue>>,
    config_files: Mutex<HashMap<String, PathBuf>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a property value
    pub fn with_property(self, name: &str, value: PropertyValue) -> Self {
        lock(&self.properties).insert(name.to_string(), value);
        self
    }

    /// Make `find_config_file` resolve `filename`
    pub fn with_config_file(self, filename: &str, path: PathBuf) -> Self {
        lock(&self.config_files).insert(filename.to_string(), path);
        self
    }

    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        lock(&self.properties).get(name).cloned()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Number of property get/set/delete calls that reached the host
    pub fn property_call_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    HostCall::GetProperty(..) | HostCall::SetProperty(..) | HostCall::DelProperty(_)
                )
            })
            .count()
    }

    /// Messages logged at the given level, in order
    pub fn logs(&self, level: LogLevel) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::Log(l, text) if *l == level => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn defined_sections(&self) -> Vec<InputSection> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::DefineSection(section) => Some(section.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn enabled_sections(&self) -> Vec<(String, InputFlags)> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                HostCall::EnableSection(name, flags) => Some((name.clone(), *flags)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        lock(&self.calls).push(call);
    }
}

/// Present a stored value in the requested format, as the host would
fn convert(value: PropertyValue, format: PropertyFormat) -> Option<PropertyValue> {
    if value.format() == format {
        return Some(value);
    }
    let node = value.into_node();
    match format {
        PropertyFormat::String => Some(PropertyValue::String(node.to_string())),
        PropertyFormat::OsdString => Some(PropertyValue::OsdString(node.to_string())),
        PropertyFormat::Node => Some(PropertyValue::Node(node)),
        PropertyFormat::Flag => match node {
            Node::Flag(b) => Some(PropertyValue::Flag(b)),
            _ => None,
        },
        PropertyFormat::Int64 => match node {
            Node::Int64(i) => Some(PropertyValue::Int64(i)),
            _ => None,
        },
        PropertyFormat::Double => match node {
            Node::Double(d) => Some(PropertyValue::Double(d)),
            Node::Int64(i) => Some(PropertyValue::Double(i as f64)),
            _ => None,
        },
    }
}

impl Host for MemoryHost {
    fn log_message(&self, level: LogLevel, text: &str) {
        match level {
            LogLevel::Fatal | LogLevel::Error => error!(target: "host", "{}", text),
            LogLevel::Warn => warn!(target: "host", "{}", text),
            LogLevel::Info => info!(target: "host", "{}", text),
            LogLevel::Debug => debug!(target: "host", "{}", text),
        }
        self.record(HostCall::Log(level, text.to_string()));
    }

    fn command(&self, args: &[String]) -> Result<(), HostError> {
        self.record(HostCall::Command(args.to_vec()));
        if args.is_empty() {
            return Err(HostError::InvalidParameter("empty command".to_string()));
        }
        Ok(())
    }

    fn command_string(&self, command: &str) -> Result<(), HostError> {
        self.record(HostCall::CommandString(command.to_string()));
        Ok(())
    }

    fn command_node(&self, command: &Node) -> Result<Node, HostError> {
        self.record(HostCall::CommandNode(command.clone()));
        Ok(Node::None)
    }

    fn get_property(&self, name: &str, format: PropertyFormat) -> Result<PropertyValue, HostError> {
        self.record(HostCall::GetProperty(name.to_string(), format));
        self.property(name)
            .and_then(|value| convert(value, format))
            .ok_or_else(|| HostError::PropertyUnavailable(name.to_string()))
    }

    fn set_property(&self, name: &str, value: &PropertyValue) -> Result<(), HostError> {
        self.record(HostCall::SetProperty(name.to_string(), value.clone()));
        lock(&self.properties).insert(name.to_string(), value.clone());
        Ok(())
    }

    fn del_property(&self, name: &str) -> Result<(), HostError> {
        self.record(HostCall::DelProperty(name.to_string()));
        lock(&self.properties)
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| HostError::PropertyUnavailable(name.to_string()))
    }

    fn define_input_section(&self, section: &InputSection) {
        self.record(HostCall::DefineSection(section.clone()));
    }

    fn enable_input_section(&self, name: &str, flags: InputFlags) {
        self.record(HostCall::EnableSection(name.to_string(), flags));
    }

    fn request_event(&self, event_id: i32, enable: bool) -> Result<(), HostError> {
        self.record(HostCall::RequestEvent(event_id, enable));
        Ok(())
    }

    fn enable_messages(&self, level: &str) -> Result<(), HostError> {
        self.record(HostCall::EnableMessages(level.to_string()));
        if LogLevel::from_name(level).is_none() && level != "no" {
            return Err(HostError::InvalidParameter(format!("log level {}", level)));
        }
        Ok(())
    }

    fn find_config_file(&self, filename: &str) -> Option<PathBuf> {
        lock(&self.config_files).get(filename).cloned()
    }
}
