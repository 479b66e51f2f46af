//! Change detection between the current and previous snapshots.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::network::{InterfaceEntry, Snapshot};

use super::WatchList;

/// What the detector knows about the previous run.
///
/// A missing state file is [`PriorState::FirstRun`]; a state file holding
/// zero interfaces is `Previous` with an empty snapshot. Both make every
/// watched interface fire, through different rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorState {
    /// No snapshot was persisted before this run.
    FirstRun,
    /// The snapshot persisted by the previous run.
    Previous(Snapshot),
}

impl PriorState {
    /// Returns true for [`PriorState::FirstRun`].
    #[must_use]
    pub const fn is_first_run(&self) -> bool {
        matches!(self, Self::FirstRun)
    }

    /// Returns the previous snapshot, if any.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Self::FirstRun => None,
            Self::Previous(snapshot) => Some(snapshot),
        }
    }
}

/// Addresses present in exactly one of two address sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDelta {
    /// Addresses in the current entry but not the previous one, in current order.
    pub added: Vec<String>,
    /// Addresses in the previous entry but not the current one, in previous order.
    pub removed: Vec<String>,
}

impl AddressDelta {
    /// Computes the symmetric difference between a previous and current entry.
    #[must_use]
    pub fn between(previous: &InterfaceEntry, current: &InterfaceEntry) -> Self {
        let before: HashSet<&str> = previous.addresses().iter().map(String::as_str).collect();
        let after: HashSet<&str> = current.addresses().iter().map(String::as_str).collect();

        Self {
            added: current
                .addresses()
                .iter()
                .filter(|a| !before.contains(a.as_str()))
                .cloned()
                .collect(),
            removed: previous
                .addresses()
                .iter()
                .filter(|a| !after.contains(a.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Returns true if both address sets were identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Why an interface qualified for notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReason {
    /// No previous state existed.
    FirstRun,
    /// The interface was absent from the previous snapshot.
    Appeared,
    /// The interface's address set changed.
    AddressesChanged(AddressDelta),
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstRun => write!(f, "first run"),
            Self::Appeared => write!(f, "interface appeared"),
            Self::AddressesChanged(delta) => {
                write!(f, "addresses changed")?;
                if !delta.added.is_empty() {
                    write!(f, ", added {}", delta.added.join(", "))?;
                }
                if !delta.removed.is_empty() {
                    write!(f, ", removed {}", delta.removed.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// A watched interface whose change qualifies for notification.
///
/// Carries an owned copy of the interface's current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The interface's state in the current snapshot.
    pub interface: InterfaceEntry,
    /// Which rule fired.
    pub reason: ChangeReason,
}

impl ChangeEvent {
    /// Creates a new change event.
    #[must_use]
    pub const fn new(interface: InterfaceEntry, reason: ChangeReason) -> Self {
        Self { interface, reason }
    }
}

/// Compares the current snapshot against prior state and returns the
/// interfaces that should be notified, in current-snapshot order.
///
/// For each entry of `current` whose name is in `watch`:
/// 1. [`PriorState::FirstRun`] → event ([`ChangeReason::FirstRun`])
/// 2. name missing from the previous snapshot → event ([`ChangeReason::Appeared`])
/// 3. otherwise, non-empty symmetric difference of the address sets →
///    event ([`ChangeReason::AddressesChanged`])
///
/// Unwatched entries never produce events. At most one event is produced
/// per interface. Interfaces that disappeared are not reported.
#[must_use]
pub fn detect(current: &Snapshot, prior: &PriorState, watch: &WatchList) -> Vec<ChangeEvent> {
    let previous: Option<HashMap<&str, &InterfaceEntry>> = prior.snapshot().map(Snapshot::by_name);

    current
        .iter()
        .filter(|entry| watch.contains(&entry.name))
        .filter_map(|entry| {
            let reason = classify(entry, previous.as_ref())?;
            Some(ChangeEvent::new(entry.clone(), reason))
        })
        .collect()
}

/// Decides which rule, if any, applies to a watched entry.
fn classify(
    entry: &InterfaceEntry,
    previous: Option<&HashMap<&str, &InterfaceEntry>>,
) -> Option<ChangeReason> {
    let Some(previous) = previous else {
        return Some(ChangeReason::FirstRun);
    };

    let Some(old) = previous.get(entry.name.as_str()) else {
        return Some(ChangeReason::Appeared);
    };

    let delta = AddressDelta::between(old, entry);
    if delta.is_empty() {
        None
    } else {
        Some(ChangeReason::AddressesChanged(delta))
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
