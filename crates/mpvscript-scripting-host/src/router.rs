//! Dispatch of host events to a script's callbacks.
//!
//! This is the only place callback failures are contained: an error return
//! or a panic from a callback is reported through the host log and the
//! router carries on. The binding stays registered.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use mpvscript_events::{ClientMessage, EventId, HostEvent};
use tracing::{debug, error};

use crate::context::ScriptContext;

/// What the router did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a client message
    Ignored,
    /// A client message whose payload could not be decoded
    Malformed,
    /// Addressed to another client
    Foreign,
    /// Key state other than key-up
    NotTriggered,
    /// No callback under this name
    UnknownCallback(String),
    Invoked(String),
    /// The callback returned an error or panicked
    Failed(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl ScriptContext {
    pub fn process_event(&mut self, event: &HostEvent) -> Dispatch {
        self.handle()
            .debug(format!("received event: {}, {}", event.id, event.data));

        if !event.is(EventId::ClientMessage) {
            return Dispatch::Ignored;
        }

        let message = match ClientMessage::decode(&event.data) {
            Ok(message) => message,
            Err(e) => {
                debug!(target: "scripting", "Dropping client message for {}: {}", self.identity(), e);
                return Dispatch::Malformed;
            }
        };

        if !message.target.belongs_to(self.identity()) {
            return Dispatch::Foreign;
        }
        if !message.triggers() {
            return Dispatch::NotTriggered;
        }

        let name = message.target.name;
        let identity = self.identity().clone();
        let Some(callback) = self.bindings_mut().callback_mut(&name) else {
            debug!(target: "scripting", "No callback {} registered for {}", name, identity);
            return Dispatch::UnknownCallback(name);
        };

        debug!(target: "scripting", "Calling callback {} for {}", name, identity);
        let failure = match panic::catch_unwind(AssertUnwindSafe(|| callback())) {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(format!("{:#}", e)),
            Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
        };

        match failure {
            None => {
                debug!(target: "scripting", "Invoked callback {} for {}", name, identity);
                Dispatch::Invoked(name)
            }
            Some(reason) => {
                error!(target: "scripting", "Callback {} for {} failed: {}", name, identity, reason);
                self.handle()
                    .error(format!("callback {} failed: {}", name, reason));
                Dispatch::Failed(name)
            }
        }
    }
}
