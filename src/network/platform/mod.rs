//! Platform interface fetcher.
//!
//! Backed by the `if-addrs` crate, which wraps `getifaddrs` on Unix and
//! `GetAdaptersAddresses` on Windows, so one implementation covers every
//! supported platform.

use crate::network::{FetchError, InterfaceFetcher, Observation};

/// Production [`InterfaceFetcher`] using the OS interface table.
///
/// Loopback and link-local addresses are reported like any other; the
/// watch list decides which interfaces matter.
///
/// # Example
///
/// ```no_run
/// use interface_notifier::network::{InterfaceFetcher, platform::PlatformFetcher};
///
/// let fetcher = PlatformFetcher::new();
/// for observation in fetcher.fetch().expect("Failed to fetch interfaces") {
///     println!("{}: {}", observation.interface, observation.address);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlatformFetcher {
    _private: (),
}

impl PlatformFetcher {
    /// Creates a new platform fetcher.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl InterfaceFetcher for PlatformFetcher {
    fn fetch(&self) -> Result<Vec<Observation>, FetchError> {
        let interfaces = if_addrs::get_if_addrs().map_err(FetchError::Enumerate)?;

        Ok(interfaces
            .into_iter()
            .map(|iface| {
                let address = iface.ip().to_string();
                Observation::new(iface.name, address)
            })
            .collect())
    }
}
