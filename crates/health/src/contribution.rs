//! Per-contributor health measurements.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

use crate::status::Status;
use crate::types::ContributorId;

/// Opaque contributor details, passed through unmodified.
pub type Details = BTreeMap<String, serde_json::Value>;

/// Outcome of running a single health check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: Status,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: Details,
}

impl Health {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            details: Details::new(),
        }
    }

    pub fn up() -> Self {
        Self::new(Status::Up)
    }

    pub fn down() -> Self {
        Self::new(Status::Down)
    }

    pub fn unknown() -> Self {
        Self::new(Status::Unknown)
    }

    pub fn out_of_service() -> Self {
        Self::new(Status::OutOfService)
    }

    /// Adds a detail entry, replacing any previous value under `key`.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<Status> for Health {
    fn from(status: Status) -> Self {
        Self::new(status)
    }
}

/// A named health measurement.
///
/// Serializes as `{"status": ..., "details": {...}}`; the id is carried by
/// the enclosing map key and `details` is omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorStatus {
    #[serde(skip)]
    id: ContributorId,
    status: Status,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    details: Details,
}

impl ContributorStatus {
    pub fn new(id: ContributorId, health: Health) -> Self {
        Self {
            id,
            status: health.status,
            details: health.details,
        }
    }

    pub fn id(&self) -> &ContributorId {
        &self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn details(&self) -> &Details {
        &self.details
    }
}

/// Snapshot of contributor statuses for one health request, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Contributions(BTreeMap<ContributorId, ContributorStatus>);

impl Contributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a contributor status, returning the one it replaced, if any.
    pub fn insert(&mut self, status: ContributorStatus) -> Option<ContributorStatus> {
        self.0.insert(status.id.clone(), status)
    }

    pub fn get(&self, id: &str) -> Option<&ContributorStatus> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContributorStatus> {
        self.0.values()
    }
}

impl FromIterator<ContributorStatus> for Contributions {
    fn from_iter<T: IntoIterator<Item = ContributorStatus>>(iter: T) -> Self {
        let mut contributions = Self::new();
        for status in iter {
            contributions.insert(status);
        }
        contributions
    }
}

impl IntoIterator for Contributions {
    type Item = ContributorStatus;
    type IntoIter = btree_map::IntoValues<ContributorId, ContributorStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}
