//! Scripting bridge for mpv
//!
//! This crate sits between loaded scripts and the host client API. Each loaded
//! script gets its own [`ScriptContext`], scoped to a client identity, which
//! owns the script's key bindings and observed properties and routes host
//! events back to the script's callbacks.

pub mod bindings;
pub mod context;
pub mod error;
pub mod input_section;
pub mod loader;
pub mod marshal;
pub mod observe;
pub mod router;
pub mod script_runner;

pub use bindings::{Binding, BindingCallback, BindingRegistry, BindingSpec, PendingBinding};
pub use context::{ScriptContext, ScriptHandle};
pub use error::BridgeError;
pub use input_section::CompiledSections;
pub use loader::{ScriptSource, discover_scripts, read_script};
pub use observe::{ObservationTable, ObservedProperty};
pub use router::Dispatch;
pub use script_runner::ScriptRunner;
