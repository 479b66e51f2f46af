//! One fetch, detect, notify, save cycle.
//!
//! [`run_once`] is generic over every collaborator so the whole cycle can
//! be exercised with in-memory fakes.

use thiserror::Error;

use crate::detect::{WatchList, detect};
use crate::network::{FetchError, InterfaceFetcher, Snapshot};
use crate::notify::{DispatchReport, Dispatcher, Notifier};
use crate::state::{SnapshotStore, StateError};

/// Error type for a failed run.
///
/// Every variant is fatal; delivery failures are not errors at this level.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to read the interface list.
    #[error("Failed to fetch interfaces: {0}")]
    Fetch(#[source] FetchError),

    /// Failed to load or save the snapshot.
    #[error("State error: {0}")]
    State(#[source] StateError),
}

impl From<FetchError> for RunError {
    fn from(error: FetchError) -> Self {
        Self::Fetch(error)
    }
}

impl From<StateError> for RunError {
    fn from(error: StateError) -> Self {
        Self::State(error)
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of change events detected.
    pub events: usize,
    /// Delivery outcomes summed over all events.
    pub deliveries: DispatchReport,
    /// Whether this was the first run (no prior snapshot).
    pub first_run: bool,
}

/// Runs one detection cycle.
///
/// 1. Fetches observations and builds the current snapshot
/// 2. Loads the prior state
/// 3. Detects changes on watched interfaces
/// 4. Dispatches each change (skipped when `dry_run`)
/// 5. Saves the current snapshot
///
/// The snapshot is saved even when deliveries fail; the next run compares
/// against what the interfaces looked like, not what was delivered.
///
/// # Errors
///
/// Returns [`RunError::Fetch`] if enumeration fails and
/// [`RunError::State`] if the prior state cannot be read or the new one
/// cannot be saved. Nothing is saved after a failed load.
pub async fn run_once<F, S, N>(
    fetcher: &F,
    store: &S,
    dispatcher: &Dispatcher<N>,
    watch: &WatchList,
    dry_run: bool,
) -> Result<RunSummary, RunError>
where
    F: InterfaceFetcher,
    S: SnapshotStore,
    N: Notifier,
{
    let current = Snapshot::from_observations(fetcher.fetch()?);
    tracing::debug!("Observed {} interface(s)", current.len());

    let prior = store.load_prior()?;
    if prior.is_first_run() {
        tracing::info!("No previous snapshot found, treating this as the first run");
    }

    let events = detect(&current, &prior, watch);
    let mut summary = RunSummary {
        events: events.len(),
        first_run: prior.is_first_run(),
        ..RunSummary::default()
    };

    if events.is_empty() {
        tracing::info!("No address changes on watched interfaces");
    }

    for event in &events {
        tracing::info!("{} changed: {}", event.interface, event.reason);
        if dry_run {
            tracing::info!("[DRY-RUN] Skipping notification for {}", event.interface.name);
            continue;
        }
        summary.deliveries.merge(dispatcher.dispatch(event).await);
    }

    store.save_current(&current)?;
    tracing::debug!("Saved snapshot of {} interface(s)", current.len());

    Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
