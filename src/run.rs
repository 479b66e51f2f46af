//! Application execution logic.
//!
//! Wires the production fetcher, state store and notifiers into one
//! detection cycle.

use interface_notifier::config::ValidatedConfig;
use interface_notifier::network::platform::PlatformFetcher;
use interface_notifier::notify::{Dispatcher, ReceiverNotifier};
use interface_notifier::pipeline::{RunError, RunSummary, run_once};
use interface_notifier::state::FileStateStore;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Executes one detection cycle.
///
/// This function:
/// 1. Builds a notifier for every configured receiver
/// 2. Opens the state file named by the config
/// 3. Fetches, detects, notifies and saves via [`run_once`]
///
/// # Errors
///
/// Returns an error if interfaces cannot be enumerated or the state file
/// cannot be read or written.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires
/// platform network APIs and real receivers.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<RunSummary, RunError> {
    if config.dry_run {
        tracing::info!("Dry-run mode enabled - changes will be logged but not sent");
    }

    if config.watch_list.is_empty() {
        tracing::warn!("No interfaces configured; nothing will be reported");
    }

    let dispatcher = build_dispatcher(&config);
    if dispatcher.is_empty() && !config.dry_run {
        tracing::warn!("No receivers configured; changes will only be logged");
    }

    let store = FileStateStore::new(&config.state_file);
    tracing::debug!("Using state file {}", store.path().display());

    run_once(
        &PlatformFetcher::new(),
        &store,
        &dispatcher,
        &config.watch_list,
        config.dry_run,
    )
    .await
}

/// Creates one notifier per configured receiver.
///
/// A receiver whose notifier cannot be built is logged and left out so the
/// others still run.
fn build_dispatcher(config: &ValidatedConfig) -> Dispatcher<ReceiverNotifier> {
    let settings = config.delivery_settings();
    let notifiers = config
        .receivers
        .iter()
        .filter_map(
            |receiver| match ReceiverNotifier::from_receiver(receiver, &settings) {
                Ok(notifier) => Some(notifier),
                Err(e) => {
                    tracing::error!("Skipping receiver {receiver}: {e}");
                    None
                }
            },
        )
        .collect();

    Dispatcher::new(notifiers)
}
