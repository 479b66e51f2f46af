//! File-based state persistence implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::network::Snapshot;

use super::{SnapshotStore, StateError};

/// Current state file format version.
///
/// Increment this when making breaking changes to the format.
const STATE_FILE_VERSION: u32 = 1;

/// File name used under the system temporary directory.
const STATE_FILE_NAME: &str = "interface-notifier.json";

/// Returns the default state file location: `<tmp>/interface-notifier.json`.
#[must_use]
pub fn default_state_path() -> PathBuf {
    std::env::temp_dir().join(STATE_FILE_NAME)
}

/// On-disk state file format.
///
/// Incompatible versions are treated as corrupt (no migrations).
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    /// Format version.
    version: u32,

    /// Unix timestamp when the state was saved.
    /// For debugging purposes only; not used in logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,

    /// The saved interfaces.
    interfaces: Snapshot,
}

impl StateFile {
    fn new(snapshot: &Snapshot) -> Self {
        Self {
            version: STATE_FILE_VERSION,
            saved_at: Some(unix_timestamp_now()),
            interfaces: snapshot.clone(),
        }
    }
}

/// Returns the current Unix timestamp as a string.
fn unix_timestamp_now() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}", duration.as_secs())
}

/// File-based implementation of [`SnapshotStore`].
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a new file-based state store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, reason: String) -> StateError {
        StateError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(default_state_path())
    }
}

impl SnapshotStore for FileStateStore {
    fn exists(&self) -> Result<bool, StateError> {
        match std::fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StateError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn load_previous(&self) -> Result<Snapshot, StateError> {
        let content = std::fs::read(&self.path).map_err(|e| StateError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        let state: StateFile = serde_json::from_slice(&content)
            .map_err(|e| self.corrupt(format!("invalid JSON: {e}")))?;

        if state.version != STATE_FILE_VERSION {
            return Err(self.corrupt(format!(
                "incompatible version: expected {STATE_FILE_VERSION}, got {}",
                state.version
            )));
        }

        Ok(state.interfaces)
    }

    fn save_current(&self, snapshot: &Snapshot) -> Result<(), StateError> {
        let content = serde_json::to_string_pretty(&StateFile::new(snapshot))
            .map_err(StateError::Serialize)?;
        let write_err = |source| StateError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        // state.json -> state.json.tmp, not state.tmp
        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        std::fs::write(&temp_path, content).map_err(write_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(write_err)?;

        Ok(())
    }
}
