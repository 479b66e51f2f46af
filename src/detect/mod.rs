//! Change detection layer.
//!
//! This module provides:
//! - The watch list of configured interface names ([`WatchList`])
//! - Explicit prior state ([`PriorState`])
//! - The pure detector ([`detect`]) and its output ([`ChangeEvent`], [`ChangeReason`])

mod change;
mod watch;

pub use change::{AddressDelta, ChangeEvent, ChangeReason, PriorState, detect};
pub use watch::WatchList;
