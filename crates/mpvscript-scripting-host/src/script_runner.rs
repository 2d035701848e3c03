use std::path::{Path, PathBuf};
use std::sync::Arc;

use mpvscript_client::Host;
use mpvscript_client::config::ScriptingConfig;
use mpvscript_events::{ClientIdentity, HostEvent};
use tracing::{debug, error, info, warn};

use crate::context::ScriptContext;
use crate::error::BridgeError;
use crate::loader;
use crate::router::Dispatch;

/// One loaded script: its load path and its context
pub struct ScriptInstance {
    pub path: PathBuf,
    pub context: ScriptContext,
}

/// Loads scripts against one host and fans host events out to all of them.
///
/// Every instance sees every event; each router filters by its own
/// identity, so a message for one script never reaches another.
pub struct ScriptRunner {
    host: Arc<dyn Host>,
    config: ScriptingConfig,
    instances: Vec<ScriptInstance>,
}

impl ScriptRunner {
    pub fn new(host: Arc<dyn Host>, config: ScriptingConfig) -> Self {
        Self {
            host,
            config,
            instances: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScriptingConfig {
        &self.config
    }

    /// Load one script.
    ///
    /// The path must exist; the identity comes from its file stem. `on_load`
    /// runs with the fresh context and registers the script's bindings and
    /// observations, then the context is flushed to the host.
    pub fn load_script<F>(&mut self, path: &Path, on_load: F) -> Result<ClientIdentity, BridgeError>
    where
        F: FnOnce(&mut ScriptContext) -> anyhow::Result<()>,
    {
        let identity = loader::identity_for(path)?;
        loader::resolve_script_path(path)?;

        if self.context(&identity).is_some() {
            warn!(
                target: "scripting",
                "Script {} shares its identity with an already loaded script; both will receive its messages",
                identity
            );
        }

        debug!(target: "scripting", "Registering script: {} ({})", identity, path.display());
        let mut context = ScriptContext::new(identity.clone(), self.host.clone());

        if let Some(level) = &self.config.message_level {
            if let Err(e) = context.handle().enable_messages(level) {
                warn!(target: "scripting", "Failed to enable {} messages for {}: {}", level, identity, e);
            }
        }

        on_load(&mut context).map_err(|cause| BridgeError::ScriptLoad {
            identity: identity.to_string(),
            cause,
        })?;
        context.flush(self.config.enable_client_message);

        self.instances.push(ScriptInstance {
            path: path.to_path_buf(),
            context,
        });
        Ok(identity)
    }

    /// Paths the configuration asks for: explicit scripts first, then
    /// whatever is in the script directory
    pub fn configured_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.config.scripts.clone();
        for found in loader::discover_scripts(&self.config.script_dir()) {
            if !paths.contains(&found) {
                paths.push(found);
            }
        }
        paths
    }

    /// Load every configured script, calling `on_load` for each. Failures
    /// are logged and returned; the remaining scripts still load.
    pub fn load_configured<F>(&mut self, mut on_load: F) -> Vec<(PathBuf, BridgeError)>
    where
        F: FnMut(&Path, &mut ScriptContext) -> anyhow::Result<()>,
    {
        if !self.config.enabled {
            debug!(target: "scripting", "Scripting disabled, not loading scripts");
            return Vec::new();
        }

        let mut failures = Vec::new();
        for path in self.configured_paths() {
            if let Err(e) = self.load_script(&path, |ctx| on_load(&path, ctx)) {
                error!(target: "scripting", "Failed to load {}: {}", path.display(), e);
                failures.push((path, e));
            }
        }

        if !self.instances.is_empty() {
            info!(target: "scripting", "Loaded {} script(s)", self.instances.len());
        }
        failures
    }

    /// Route one host event to every loaded script
    pub fn handle_event(&mut self, event: &HostEvent) -> Vec<(ClientIdentity, Dispatch)> {
        self.instances
            .iter_mut()
            .map(|instance| {
                let outcome = instance.context.process_event(event);
                (instance.context.identity().clone(), outcome)
            })
            .collect()
    }

    pub fn script_count(&self) -> usize {
        self.instances.len()
    }

    pub fn script_ids(&self) -> Vec<&ClientIdentity> {
        self.instances.iter().map(|i| i.context.identity()).collect()
    }

    pub fn instances(&self) -> &[ScriptInstance] {
        &self.instances
    }

    pub fn context(&self, identity: &ClientIdentity) -> Option<&ScriptContext> {
        self.instances
            .iter()
            .map(|i| &i.context)
            .find(|ctx| ctx.identity() == identity)
    }

    /// Hand the instances over, e.g. to run each on its own task
    pub fn into_instances(self) -> Vec<ScriptInstance> {
        self.instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindingSpec;
    use mpvscript_client::{HostCall, MemoryHost};
    use std::fs;
    use tempfile::TempDir;

    fn runner(config: ScriptingConfig) -> (Arc<MemoryHost>, ScriptRunner) {
        let host = Arc::new(MemoryHost::new());
        (host.clone(), ScriptRunner::new(host, config))
    }

    fn script(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_load_flushes_sections() {
        let dir = TempDir::new().unwrap();
        let (host, mut runner) = runner(ScriptingConfig::default());
        let id = runner
            .load_script(&script(&dir, "seek.py"), |ctx| {
                let _ = ctx.add_binding(BindingSpec::new().key("s").name("seek"));
                Ok(())
            })
            .unwrap();

        assert_eq!(id, ClientIdentity::new("seek"));
        assert_eq!(runner.script_count(), 1);
        assert!(host.calls().contains(&HostCall::RequestEvent(16, true)));
        let sections = host.defined_sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "py_seek_kbs");
    }

    #[test]
    fn test_client_message_not_requested_when_disabled() {
        let dir = TempDir::new().unwrap();
        let config = ScriptingConfig {
            enable_client_message: false,
            ..ScriptingConfig::default()
        };
        let (host, mut runner) = runner(config);
        runner
            .load_script(&script(&dir, "a.py"), |ctx| {
                let _ = ctx.add_binding(BindingSpec::new().key("a"));
                Ok(())
            })
            .unwrap();
        assert!(!host.calls().iter().any(|c| matches!(c, HostCall::RequestEvent(..))));
    }

    #[test]
    fn test_message_level_enabled_on_load() {
        let dir = TempDir::new().unwrap();
        let config = ScriptingConfig {
            message_level: Some("warn".into()),
            ..ScriptingConfig::default()
        };
        let (host, mut runner) = runner(config);
        runner.load_script(&script(&dir, "a.py"), |_| Ok(())).unwrap();
        assert_eq!(host.calls()[0], HostCall::EnableMessages("warn".into()));
    }

    #[test]
    fn test_missing_script_is_hard_failure() {
        let dir = TempDir::new().unwrap();
        let (_, mut runner) = runner(ScriptingConfig::default());
        let err = runner
            .load_script(&dir.path().join("gone.py"), |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, BridgeError::ScriptNotFound(_)));
        assert_eq!(runner.script_count(), 0);
    }

    #[test]
    fn test_on_load_error_propagates() {
        let dir = TempDir::new().unwrap();
        let (_, mut runner) = runner(ScriptingConfig::default());
        let err = runner
            .load_script(&script(&dir, "bad.py"), |_| anyhow::bail!("syntax error"))
            .unwrap_err();
        assert_eq!(err.to_string(), "script bad failed to load: syntax error");
        assert_eq!(runner.script_count(), 0);
    }

    #[test]
    fn test_load_configured_uses_script_dir() {
        let dir = TempDir::new().unwrap();
        script(&dir, "one.py");
        script(&dir, "two.py");
        let config = ScriptingConfig {
            script_dir: Some(dir.path().to_path_buf()),
            ..ScriptingConfig::default()
        };
        let (_, mut runner) = runner(config);
        let failures = runner.load_configured(|_, _| Ok(()));
        assert!(failures.is_empty());
        let ids: Vec<&str> = runner
            .script_ids()
            .into_iter()
            .map(ClientIdentity::as_str)
            .collect();
        assert_eq!(ids, vec!["one", "two"]);
    }

    #[test]
    fn test_load_configured_reports_failures() {
        let dir = TempDir::new().unwrap();
        let config = ScriptingConfig {
            scripts: vec![dir.path().join("missing.py")],
            script_dir: Some(dir.path().to_path_buf()),
            ..ScriptingConfig::default()
        };
        let (_, mut runner) = runner(config);
        let failures = runner.load_configured(|_, _| Ok(()));
        assert_eq!(failures.len(), 1);
        assert_eq!(runner.script_count(), 0);
    }

    #[test]
    fn test_disabled_loads_nothing() {
        let dir = TempDir::new().unwrap();
        script(&dir, "one.py");
        let config = ScriptingConfig {
            enabled: false,
            script_dir: Some(dir.path().to_path_buf()),
            ..ScriptingConfig::default()
        };
        let (_, mut runner) = runner(config);
        assert!(runner.load_configured(|_, _| Ok(())).is_empty());
        assert_eq!(runner.script_count(), 0);
    }
}
