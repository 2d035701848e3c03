use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mpvscript_events::ClientIdentity;
use tracing::{debug, warn};

use crate::error::BridgeError;

/// Entry file looked up when a script path names a directory
pub const DIRECTORY_ENTRY: &str = "main.py";

const SCRIPT_EXTENSION: &str = "py";

/// A script's source, resolved and read from disk
#[derive(Debug, Clone)]
pub struct ScriptSource {
    /// The path the script was requested under
    pub requested: PathBuf,
    /// The file that was actually read
    pub path: PathBuf,
    pub identity: ClientIdentity,
    pub source: String,
}

/// Resolve a script path to the file to read. Directories resolve to their
/// entry file. Anything missing is a [`BridgeError::ScriptNotFound`].
pub fn resolve_script_path(path: &Path) -> Result<PathBuf, BridgeError> {
    let resolved = fs::canonicalize(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => BridgeError::ScriptNotFound(path.to_path_buf()),
        _ => BridgeError::Io(e),
    })?;

    let file = if resolved.is_dir() {
        resolved.join(DIRECTORY_ENTRY)
    } else {
        resolved
    };

    if !file.is_file() {
        return Err(BridgeError::ScriptNotFound(file));
    }
    Ok(file)
}

/// Identity of the script at `path`, taken from the requested path rather
/// than the resolved entry file
pub fn identity_for(path: &Path) -> Result<ClientIdentity, BridgeError> {
    ClientIdentity::from_path(path).ok_or_else(|| BridgeError::NoIdentity(path.to_path_buf()))
}

pub fn read_script(path: &Path) -> Result<ScriptSource, BridgeError> {
    let identity = identity_for(path)?;
    let file = resolve_script_path(path)?;
    debug!(target: "scripting", "Reading script {} from {}", identity, file.display());
    let source = fs::read_to_string(&file)?;
    Ok(ScriptSource {
        requested: path.to_path_buf(),
        path: file,
        identity,
        source,
    })
}

/// Whether `path` is something the loader would accept
pub fn is_script_path(path: &Path) -> bool {
    if path.is_dir() {
        return path.join(DIRECTORY_ENTRY).is_file();
    }
    path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION)
}

/// List loadable scripts in a directory, sorted by path. A missing
/// directory yields no scripts.
pub fn discover_scripts(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(target: "scripting", "Failed to read script directory {}: {}", dir.display(), e);
            }
            return Vec::new();
        }
    };

    let mut scripts: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_script_path(path))
        .collect();
    scripts.sort();
    debug!(target: "scripting", "Found {} script(s) in {}", scripts.len(), dir.display());
    scripts
}
