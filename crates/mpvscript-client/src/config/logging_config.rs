use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file in the data directory
    #[serde(default)]
    pub file: bool,

    /// Filter directive used when RUST_LOG is not set (default: info)
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn filter(&self) -> &str {
        self.filter.as_deref().unwrap_or("info")
    }
}
