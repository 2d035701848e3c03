use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths::ProjectPaths;

/// Helper function for default true value
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptingConfig {
    /// Whether scripting is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Explicit script paths to load, in order
    #[serde(default)]
    pub scripts: Vec<PathBuf>,

    /// Directory containing scripts (default: <data dir>/scripts)
    #[serde(default)]
    pub script_dir: Option<PathBuf>,

    /// Request client-message delivery on flush when a script has bindings
    #[serde(default = "default_true")]
    pub enable_client_message: bool,

    /// Host log level scripts subscribe to on load, if any
    #[serde(default)]
    pub message_level: Option<String>,
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scripts: Vec::new(),
            script_dir: None,
            enable_client_message: true,
            message_level: None,
        }
    }
}

impl ScriptingConfig {
    /// Get the script directory path (use provided or default)
    pub fn script_dir(&self) -> PathBuf {
        self.script_dir.clone().unwrap_or_else(|| {
            ProjectPaths::new("mpvscript")
                .map(|p| p.data_dir().join("scripts"))
                .unwrap_or_else(|| PathBuf::from(".scripts"))
        })
    }
}
