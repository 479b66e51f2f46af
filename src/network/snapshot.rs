//! Interface snapshot types and the observation builder.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw `(interface, address)` pair reported by the OS.
///
/// Fetchers return these unmerged; an interface with three addresses
/// appears as three observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Interface name as reported by the OS (e.g., "eth0", "Wi-Fi").
    pub interface: String,
    /// Textual address (IPv4 dotted quad or IPv6).
    pub address: String,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub fn new(interface: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            address: address.into(),
        }
    }
}

/// The addresses of one interface at a point in time.
///
/// The addresses behave as a set: they can only be added through
/// [`InterfaceEntry::insert`], which drops duplicates. Insertion order is
/// kept only so logs and notifications read naturally; two entries with
/// the same addresses in a different order are equal.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(from = "RawEntry")]
pub struct InterfaceEntry {
    /// Interface name, unique within a [`Snapshot`].
    pub name: String,
    addresses: Vec<String>,
}

/// Wire shape of an entry; decoding goes through [`InterfaceEntry::new`].
#[derive(Deserialize)]
struct RawEntry {
    name: String,
    addresses: Vec<String>,
}

impl From<RawEntry> for InterfaceEntry {
    fn from(raw: RawEntry) -> Self {
        Self::new(raw.name, raw.addresses)
    }
}

impl InterfaceEntry {
    /// Creates an entry, collapsing duplicate addresses.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entry = Self {
            name: name.into(),
            addresses: Vec::new(),
        };
        for address in addresses {
            entry.insert(address.into());
        }
        entry
    }

    /// Adds an address unless it is already present.
    ///
    /// Returns `true` if the address was new.
    pub fn insert(&mut self, address: String) -> bool {
        if self.contains(&address) {
            return false;
        }
        self.addresses.push(address);
        true
    }

    /// Textual addresses in first-seen order, without duplicates.
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Returns true if the entry holds the given address.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }
}

impl PartialEq for InterfaceEntry {
    fn eq(&self, other: &Self) -> bool {
        let mine: HashSet<&str> = self.addresses.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = other.addresses.iter().map(String::as_str).collect();
        self.name == other.name && mine == theirs
    }
}

impl fmt::Display for InterfaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.addresses.join(", "))
    }
}

/// All observed interfaces and their addresses at one point in time.
///
/// Entries keep first-seen order and names are unique. Construct through
/// [`Snapshot::from_observations`] or [`Snapshot::from_entries`], both of
/// which merge repeated names into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: Vec<InterfaceEntry>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Groups raw observations into one entry per interface name.
    ///
    /// Names keep first-seen order; addresses keep insertion order within
    /// each entry and duplicates are collapsed.
    #[must_use]
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut builder = Builder::default();
        for observation in observations {
            builder.entry(observation.interface).insert(observation.address);
        }
        builder.finish()
    }

    /// Builds a snapshot from entries, merging any that share a name.
    ///
    /// Entries without addresses are kept.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = InterfaceEntry>) -> Self {
        let mut builder = Builder::default();
        for entry in entries {
            let merged = builder.entry(entry.name);
            for address in entry.addresses {
                merged.insert(address);
            }
        }
        builder.finish()
    }

    /// Returns the entries in order.
    #[must_use]
    pub fn entries(&self) -> &[InterfaceEntry] {
        &self.entries
    }

    /// Iterates over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, InterfaceEntry> {
        self.entries.iter()
    }

    /// Returns the number of interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no interfaces were observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexes the entries by interface name.
    #[must_use]
    pub fn by_name(&self) -> HashMap<&str, &InterfaceEntry> {
        self.entries.iter().map(|e| (e.name.as_str(), e)).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a InterfaceEntry;
    type IntoIter = std::slice::Iter<'a, InterfaceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Observation> for Snapshot {
    fn from_iter<T: IntoIterator<Item = Observation>>(iter: T) -> Self {
        Self::from_observations(iter)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<InterfaceEntry>::deserialize(deserializer).map(Self::from_entries)
    }
}

/// Merges entries by name while preserving first-seen order.
#[derive(Default)]
struct Builder {
    entries: Vec<InterfaceEntry>,
    index: HashMap<String, usize>,
}

impl Builder {
    fn entry(&mut self, name: String) -> &mut InterfaceEntry {
        let idx = match self.index.get(&name) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(name.clone(), idx);
                self.entries.push(InterfaceEntry {
                    name,
                    addresses: Vec::new(),
                });
                idx
            }
        };
        &mut self.entries[idx]
    }

    fn finish(self) -> Snapshot {
        Snapshot {
            entries: self.entries,
        }
    }
}
