//! Network layer for observing interface addresses.
//!
//! This module provides types and traits for:
//! - Representing raw OS observations ([`Observation`])
//! - Grouping observations into per-interface snapshots ([`Snapshot`], [`InterfaceEntry`])
//! - Fetching observations from the OS ([`InterfaceFetcher`])
//! - The platform implementation ([`platform`])

mod fetcher;
pub mod platform;
mod snapshot;

pub use fetcher::{FetchError, InterfaceFetcher};
pub use snapshot::{InterfaceEntry, Observation, Snapshot};
