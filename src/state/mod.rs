//! Snapshot persistence between runs.
//!
//! The previous run's snapshot is the only history the tool keeps. A missing
//! state file means "first run"; a state file that exists but cannot be
//! decoded is fatal, since guessing would hide real changes.
//!
//! Concurrent runs against the same state path are not supported and no
//! locking is done: the tool assumes one instance per scheduling tick.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::{FileStateStore, default_state_path};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::detect::PriorState;
use crate::network::Snapshot;

/// Errors that can occur during state persistence operations.
///
/// Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to check whether the state file exists.
    #[error("Failed to access state file '{}': {source}", path.display())]
    Io {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to read the state file.
    #[error("Failed to read state file '{}': {source}", path.display())]
    Read {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The state file exists but does not hold a valid snapshot.
    #[error("State file '{}' is corrupt ({reason}); delete it to start fresh", path.display())]
    Corrupt {
        /// Path to the state file
        path: PathBuf,
        /// Why decoding failed
        reason: String,
    },

    /// Failed to serialize the snapshot.
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to write the state file.
    #[error("Failed to write state file '{}': {source}", path.display())]
    Write {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl StateError {
    /// Returns true if the state file exists but is unreadable as a snapshot.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Abstraction for persisting the snapshot between program runs.
///
/// Implementations should:
/// - Report a missing file through [`exists`](Self::exists), not as an error
/// - Treat undecodable content as [`StateError::Corrupt`]
/// - Use atomic writes so a crash never leaves a half-written file
pub trait SnapshotStore {
    /// Reports whether a previous snapshot has been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Io`] if the location cannot be inspected for
    /// any reason other than "not found".
    fn exists(&self) -> Result<bool, StateError>;

    /// Loads the previously persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Corrupt`] if the content cannot be decoded, or
    /// [`StateError::Read`] if it cannot be read.
    fn load_previous(&self) -> Result<Snapshot, StateError>;

    /// Persists the current snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    fn save_current(&self, snapshot: &Snapshot) -> Result<(), StateError>;

    /// Loads prior state as an explicit first-run / previous distinction.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`exists`](Self::exists) and
    /// [`load_previous`](Self::load_previous).
    fn load_prior(&self) -> Result<PriorState, StateError> {
        if self.exists()? {
            self.load_previous().map(PriorState::Previous)
        } else {
            Ok(PriorState::FirstRun)
        }
    }
}
