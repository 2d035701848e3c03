use std::fmt;
use std::path::Path;

/// Joins a client identity and a local name on shared channels
pub const SEPARATOR: &str = "___";

/// Stable name of one loaded script instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the identity from a script load path: the file stem, so
    /// `scripts/seek.py` and a script directory `scripts/seek/` both
    /// become `seek`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local name namespaced by the client identity that owns it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundKey {
    pub client: ClientIdentity,
    pub name: String,
}

impl CompoundKey {
    pub fn new(client: ClientIdentity, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    /// Wire form: `<client>___<name>`
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.client, SEPARATOR, self.name)
    }

    /// Split the wire form at the first separator
    pub fn parse(raw: &str) -> Option<Self> {
        let (client, name) = raw.split_once(SEPARATOR)?;
        Some(Self::new(ClientIdentity::new(client), name))
    }

    pub fn belongs_to(&self, client: &ClientIdentity) -> bool {
        &self.client == client
    }
}

impl fmt::Display for CompoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.client, SEPARATOR, self.name)
    }
}
