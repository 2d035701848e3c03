use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use mpvscript_client::{Host, HostError, LogLevel, Node, PropertyFormat};
use mpvscript_events::{ClientIdentity, EventId};
use tracing::debug;

use crate::bindings::{BindingRegistry, BindingSpec, PendingBinding};
use crate::error::BridgeError;
use crate::input_section::{self, CompiledSections};
use crate::observe::{ObservationTable, ObservedProperty};

/// Cheap, cloneable access to the host on behalf of one client.
///
/// Callbacks capture a clone of this to talk to the host; it carries no
/// binding or observation state.
#[derive(Clone)]
pub struct ScriptHandle {
    identity: ClientIdentity,
    host: Arc<dyn Host>,
}

impl fmt::Debug for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptHandle")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl ScriptHandle {
    pub fn new(identity: ClientIdentity, host: Arc<dyn Host>) -> Self {
        Self { identity, host }
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    // ===== Logging =====

    /// Log to the host as `(<identity>) <message>`; empty messages are dropped
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        let message = message.to_string();
        if message.is_empty() {
            return;
        }
        self.host
            .log_message(level, &format!("({}) {}", self.identity, message));
    }

    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(LogLevel::Fatal, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    // ===== Commands =====

    /// Run `name` with the given arguments
    pub fn command<I, S>(&self, name: &str, args: I) -> Result<(), HostError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = std::iter::once(name.to_string())
            .chain(args.into_iter().map(Into::into))
            .collect();
        self.host.command(&argv)
    }

    pub fn command_string(&self, command: &str) -> Result<(), HostError> {
        self.host.command_string(command)
    }

    pub fn command_node(&self, command: &Node) -> Result<Node, HostError> {
        self.host.command_node(command)
    }

    /// Show text on the OSD. Duration is in milliseconds; without one the
    /// host default applies.
    pub fn osd_message(
        &self,
        text: &str,
        duration_ms: Option<i64>,
        level: Option<u8>,
    ) -> Result<(), HostError> {
        let mut args = vec![
            text.to_string(),
            duration_ms.unwrap_or(-1).to_string(),
        ];
        if let Some(level) = level {
            args.push(level.to_string());
        }
        self.command("show-text", args)
    }

    // ===== Host services =====

    /// Enable or disable an event by its host-facing name, e.g. `file-loaded`
    pub fn request_event(&self, name: &str, enable: bool) -> Result<(), BridgeError> {
        let id = EventId::from_name(name).ok_or_else(|| BridgeError::UnknownEvent(name.to_string()))?;
        self.request_event_id(id, enable)?;
        Ok(())
    }

    pub fn request_event_id(&self, id: EventId, enable: bool) -> Result<(), HostError> {
        self.host.request_event(id.to_discriminant(), enable)
    }

    pub fn enable_messages(&self, level: &str) -> Result<(), HostError> {
        self.host.enable_messages(level)
    }

    pub fn find_config_file(&self, filename: &str) -> Option<PathBuf> {
        self.host.find_config_file(filename)
    }

    pub fn extension_ok(&self) -> bool {
        self.host.extension_ok()
    }
}

/// State owned by one loaded script instance.
///
/// Nothing in here is shared between instances. The router and the section
/// compiler only ever see the registry through this context.
pub struct ScriptContext {
    handle: ScriptHandle,
    bindings: BindingRegistry,
    observed: ObservationTable,
}

impl ScriptContext {
    pub fn new(identity: ClientIdentity, host: Arc<dyn Host>) -> Self {
        Self {
            bindings: BindingRegistry::new(identity.clone()),
            observed: ObservationTable::new(identity.clone()),
            handle: ScriptHandle::new(identity, host),
        }
    }

    pub fn identity(&self) -> &ClientIdentity {
        self.handle.identity()
    }

    /// Host access for this client; clone it into callbacks
    pub fn handle(&self) -> &ScriptHandle {
        &self.handle
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    pub(crate) fn bindings_mut(&mut self) -> &mut BindingRegistry {
        &mut self.bindings
    }

    pub fn observed(&self) -> &ObservationTable {
        &self.observed
    }

    pub fn add_binding(&mut self, spec: BindingSpec) -> PendingBinding<'_> {
        self.bindings.add_binding(spec)
    }

    pub fn has_bindings(&self) -> bool {
        self.bindings.has_bindings()
    }

    pub fn observe_property(
        &mut self,
        name: &str,
        format: PropertyFormat,
        reply_token: u64,
    ) -> &ObservedProperty {
        self.observed.observe(name, format, reply_token)
    }

    /// Compile the bindings into input sections and hand them to the host
    pub fn build_input_sections(&self) -> CompiledSections {
        let sections = input_section::compile(&self.bindings);
        sections.apply(self.handle.host());
        sections
    }

    /// Ask the host to deliver client messages, if there is anything bound.
    /// Returns whether the request was made and accepted.
    pub fn enable_client_message(&self) -> bool {
        if !self.has_bindings() {
            return false;
        }
        match self.handle.request_event_id(EventId::ClientMessage, true) {
            Ok(()) => {
                self.handle.debug("enabled client-message");
                true
            }
            Err(e) => {
                self.handle
                    .error(format!("failed to enable client-message: {}", e));
                false
            }
        }
    }

    /// Push the script's current registrations to the host
    pub fn flush(&self, enable_client_message: bool) -> CompiledSections {
        self.handle.debug("flushing");
        debug!(target: "scripting", "Flushing {}", self.identity());
        if enable_client_message {
            self.enable_client_message();
        }
        self.build_input_sections()
    }
}
