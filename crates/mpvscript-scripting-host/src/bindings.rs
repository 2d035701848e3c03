use std::collections::{BTreeMap, HashMap};
use std::fmt;

use mpvscript_client::Node;
use mpvscript_events::{ClientIdentity, CompoundKey};
use tracing::debug;

/// Input backend that routes `script-binding` commands back to this bridge
const BINDING_BACKEND: &str = "python";

/// Callback run when a bound key is released
pub type BindingCallback = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// What a script asks for when adding a binding
#[derive(Debug, Clone, Default)]
pub struct BindingSpec {
    pub key: Option<String>,
    pub name: Option<String>,
    pub builtin: bool,
    pub options: BTreeMap<String, Node>,
}

impl BindingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn builtin(mut self, builtin: bool) -> Self {
        self.builtin = builtin;
        self
    }

    /// Extra option, stored verbatim on the binding record
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }
}

/// A registered key binding
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub id: u64,
    pub name: String,
    pub key: Option<String>,
    /// Input line handed to the host; only present when a key was given
    pub input: Option<String>,
    pub builtin: bool,
    pub options: BTreeMap<String, Node>,
}

/// Key bindings and their callbacks for one client.
///
/// Ids come from a counter that starts at 1 and is incremented before use,
/// so the first binding gets id 2. Ids are never reused, even when a later
/// registration replaces an earlier one with the same name.
pub struct BindingRegistry {
    identity: ClientIdentity,
    next_id: u64,
    binds: HashMap<String, Binding>,
    callbacks: HashMap<String, BindingCallback>,
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("identity", &self.identity)
            .field("next_id", &self.next_id)
            .field("binds", &self.binds)
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BindingRegistry {
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            next_id: 1,
            binds: HashMap::new(),
            callbacks: HashMap::new(),
        }
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Register a binding record. The callback is attached with
    /// [`PendingBinding::bind`].
    pub fn add_binding(&mut self, spec: BindingSpec) -> PendingBinding<'_> {
        self.next_id += 1;
        let id = self.next_id;
        let name = spec
            .name
            .unwrap_or_else(|| format!("__keybinding{}", id));

        let input = spec.key.as_ref().map(|key| {
            format!(
                "{} script-binding {}/{}",
                key,
                BINDING_BACKEND,
                CompoundKey::new(self.identity.clone(), name.clone())
            )
        });

        debug!(target: "scripting", "Adding binding {} ({}) for {}", name, id, self.identity);

        self.binds.insert(
            name.clone(),
            Binding {
                id,
                name: name.clone(),
                key: spec.key,
                input,
                builtin: spec.builtin,
                options: spec.options,
            },
        );

        PendingBinding {
            registry: self,
            name,
            id,
        }
    }

    pub fn has_bindings(&self) -> bool {
        !self.binds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.binds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.binds.get(name)
    }

    /// Bindings in id order
    pub fn bindings(&self) -> Vec<&Binding> {
        let mut all: Vec<&Binding> = self.binds.values().collect();
        all.sort_by_key(|b| b.id);
        all
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub(crate) fn callback_mut(&mut self, name: &str) -> Option<&mut BindingCallback> {
        self.callbacks.get_mut(name)
    }
}

/// A freshly added binding waiting for its callback
#[must_use = "a binding without a callback never fires"]
pub struct PendingBinding<'a> {
    registry: &'a mut BindingRegistry,
    name: String,
    id: u64,
}

impl PendingBinding<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Attach the callback; returns the binding name
    pub fn bind<F>(self, callback: F) -> String
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.registry
            .callbacks
            .insert(self.name.clone(), Box::new(callback));
        self.name
    }
}
