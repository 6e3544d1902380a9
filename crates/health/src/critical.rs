//! The configured set of critical contributors.

use std::collections::BTreeSet;

use crate::types::ContributorId;

/// Contributor ids whose status decides the overall status.
///
/// Built once from configuration and never changed afterwards. Entries are
/// trimmed; blank entries are dropped and duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriticalSet {
    ids: BTreeSet<ContributorId>,
}

impl CriticalSet {
    /// Creates an empty critical set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a critical set from raw ids.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids
            .into_iter()
            .filter_map(|raw| ContributorId::new(raw).ok())
            .collect();
        Self { ids }
    }

    /// Parses a comma-separated list such as `"admin, moneyMovement"`.
    pub fn parse(list: &str) -> Self {
        Self::from_ids(list.split(','))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContributorId> {
        self.ids.iter()
    }
}

impl FromIterator<ContributorId> for CriticalSet {
    fn from_iter<T: IntoIterator<Item = ContributorId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for CriticalSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.ids.iter().map(ContributorId::as_str).collect();
        f.write_str(&ids.join(","))
    }
}
