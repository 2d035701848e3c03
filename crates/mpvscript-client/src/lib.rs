//! Client API boundary for mpvscript
//!
//! This crate describes the player host as the scripting bridge sees it: the
//! [`Host`] trait with its typed property protocol, input sections, and the
//! shared configuration. Nothing here knows about individual scripts.

pub mod config;
pub mod host;
pub mod memory_host;
pub mod node;
pub mod property;

pub use host::{Host, HostError, InputFlags, InputSection, LogLevel};
pub use memory_host::{HostCall, MemoryHost};
pub use node::Node;
pub use property::{PropertyFormat, PropertyValue};
