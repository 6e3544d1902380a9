//! Health statuses and the severity order used to rank them.

use std::str::FromStr;

use serde::Serialize;

use crate::error::HealthError;

/// Status reported by a contributor or computed for the whole application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Component is functioning as expected.
    Up,
    /// Component state could not be determined.
    Unknown,
    /// Component is intentionally taken out of service.
    OutOfService,
    /// Component is failing.
    Down,
}

impl Status {
    /// All statuses from most to least severe.
    pub const ALL: [Status; 4] = [
        Status::Down,
        Status::OutOfService,
        Status::Unknown,
        Status::Up,
    ];

    /// Returns the wire code of the status, e.g. `OUT_OF_SERVICE`.
    pub fn code(self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Unknown => "UNKNOWN",
            Status::OutOfService => "OUT_OF_SERVICE",
            Status::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Status {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.code() == normalized)
            .ok_or_else(|| HealthError::UnknownStatus(s.trim().to_string()))
    }
}

/// Strict total order over [`Status`], used to pick the worst status.
///
/// Statuses are held from most to least severe. Ranking an empty set of
/// statuses yields `empty_default`, which the owner of the order chooses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOrder {
    severity: Vec<Status>,
    empty_default: Status,
}

impl StatusOrder {
    /// Builds an order from statuses listed most severe first.
    ///
    /// Statuses missing from `most_severe_first` are appended after the listed
    /// ones, in default order, so the result always covers every status.
    pub fn new(
        most_severe_first: impl IntoIterator<Item = Status>,
        empty_default: Status,
    ) -> Result<Self, HealthError> {
        let mut severity = Vec::with_capacity(Status::ALL.len());
        for status in most_severe_first {
            if severity.contains(&status) {
                return Err(HealthError::DuplicateStatus(status));
            }
            severity.push(status);
        }
        for status in Status::ALL {
            if !severity.contains(&status) {
                severity.push(status);
            }
        }
        Ok(Self {
            severity,
            empty_default,
        })
    }

    /// Parses a comma-separated list of status codes, most severe first.
    pub fn parse(most_severe_first: &str, empty_default: Status) -> Result<Self, HealthError> {
        let statuses = most_severe_first
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(Status::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(statuses, empty_default)
    }

    /// Returns a copy of this order with a different empty default.
    #[must_use]
    pub fn with_empty_default(mut self, empty_default: Status) -> Self {
        self.empty_default = empty_default;
        self
    }

    /// Status returned when ranking no statuses at all.
    pub fn empty_default(&self) -> Status {
        self.empty_default
    }

    /// Statuses from most to least severe.
    pub fn severity(&self) -> &[Status] {
        &self.severity
    }

    /// Severity of `status`; higher is worse.
    pub fn severity_of(&self, status: Status) -> usize {
        let position = self
            .severity
            .iter()
            .position(|candidate| *candidate == status)
            .unwrap_or(self.severity.len());
        self.severity.len() - position
    }

    /// Returns the worst status in `statuses`, or the empty default.
    pub fn rank(&self, statuses: impl IntoIterator<Item = Status>) -> Status {
        statuses
            .into_iter()
            .max_by_key(|status| self.severity_of(*status))
            .unwrap_or(self.empty_default)
    }
}

impl Default for StatusOrder {
    fn default() -> Self {
        Self {
            severity: Status::ALL.to_vec(),
            empty_default: Status::Unknown,
        }
    }
}
