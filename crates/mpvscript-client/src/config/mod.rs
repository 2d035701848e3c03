pub mod logging_config;
pub mod mpvscript_config;
pub mod paths;
pub mod scripting_config;

pub use logging_config::LoggingConfig;
pub use mpvscript_config::{ConfigLoadError, MpvScriptConfig};
pub use paths::ProjectPaths;
pub use scripting_config::ScriptingConfig;
