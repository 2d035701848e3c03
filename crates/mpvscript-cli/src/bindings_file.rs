//! Declarative bindings files for offline inspection.
//!
//! A bindings file describes what a script registers on load, so sections
//! and dispatch can be checked without a running player:
//!
//! ```toml
//! identity = "seek"          # optional, defaults to the file stem
//!
//! [[binding]]
//! key = "ctrl+right"
//! name = "forward"
//! options = { repeatable = true }
//!
//! [[observe]]
//! name = "time-pos"
//! format = "double"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use mpvscript_client::PropertyFormat;
use mpvscript_events::ClientIdentity;
use mpvscript_scripting_host::{BindingSpec, ScriptContext};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindingsFileError {
    #[error("failed to read bindings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse bindings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown property format {0:?}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingEntry {
    pub key: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub builtin: bool,
    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObserveEntry {
    pub name: String,
    /// Format name, e.g. `int64` or `osd-string`
    pub format: String,
    #[serde(default)]
    pub reply_token: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingsFile {
    pub identity: Option<String>,
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingEntry>,
    #[serde(default)]
    pub observe: Vec<ObserveEntry>,
}

fn format_by_name(name: &str) -> Option<PropertyFormat> {
    PropertyFormat::ALL.into_iter().find(|format| {
        let format_name: &'static str = (*format).into();
        format_name == name
    })
}

impl BindingsFile {
    pub fn load(path: &Path) -> Result<Self, BindingsFileError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, BindingsFileError> {
        Ok(toml::from_str(content)?)
    }

    /// The explicit identity, or the file stem of `path`
    pub fn identity(&self, path: &Path) -> Option<ClientIdentity> {
        match &self.identity {
            Some(identity) => Some(ClientIdentity::new(identity.clone())),
            None => ClientIdentity::from_path(path),
        }
    }

    /// Register every entry on `ctx`. Each binding's callback logs that it
    /// fired through the host.
    pub fn register(&self, ctx: &mut ScriptContext) -> Result<(), BindingsFileError> {
        for entry in &self.observe {
            let format = format_by_name(&entry.format)
                .ok_or_else(|| BindingsFileError::UnknownFormat(entry.format.clone()))?;
            ctx.observe_property(&entry.name, format, entry.reply_token);
        }

        for entry in &self.bindings {
            let mut spec = BindingSpec::new().builtin(entry.builtin);
            if let Some(key) = &entry.key {
                spec = spec.key(key.clone());
            }
            if let Some(name) = &entry.name {
                spec = spec.name(name.clone());
            }
            for (option, value) in &entry.options {
                spec = spec.option(option.clone(), value.clone());
            }

            let handle = ctx.handle().clone();
            let pending = ctx.add_binding(spec);
            let name = pending.name().to_string();
            pending.bind(move || {
                handle.info(format!("fired {}", name));
                Ok(())
            });
        }
        Ok(())
    }
}
