//! Interface fetching trait and error types.

use super::Observation;
use thiserror::Error;

/// Error type for interface enumeration.
///
/// Always fatal to a run: a partial interface list would produce
/// false "appeared" or "changed" events on the next run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The OS refused or failed to enumerate interfaces.
    #[error("Failed to enumerate network interfaces: {0}")]
    Enumerate(#[source] std::io::Error),

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Trait for fetching raw interface address observations from the OS.
///
/// # Design
///
/// - Returns unmerged `(interface, address)` pairs; grouping is done by
///   [`Snapshot::from_observations`](super::Snapshot::from_observations)
/// - Enables dependency injection for testing with mock implementations
///
/// # Example
///
/// ```ignore
/// use interface_notifier::network::{FetchError, InterfaceFetcher, Observation};
///
/// struct StaticFetcher(Vec<Observation>);
///
/// impl InterfaceFetcher for StaticFetcher {
///     fn fetch(&self) -> Result<Vec<Observation>, FetchError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait InterfaceFetcher: Send + Sync {
    /// Fetches every address currently assigned to every interface.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the platform API call fails.
    ///
    /// # Implementation Notes
    ///
    /// - Implementations should return ALL interfaces; the watch list is
    ///   applied by the change detector
    /// - Address order within an interface should be stable across calls
    fn fetch(&self) -> Result<Vec<Observation>, FetchError>;
}
