//! The set of interface names eligible for notification.

use std::collections::HashSet;

/// Interface names configured for watching.
///
/// An interface absent from this set never produces a change event,
/// whatever happens to its addresses. Lookups are by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchList {
    names: HashSet<String>,
}

impl WatchList {
    /// Creates a watch list from interface names. Duplicates are ignored.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the interface is watched.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of watched interfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing is watched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the watched names sorted, for stable log output.
    #[must_use]
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for WatchList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}
