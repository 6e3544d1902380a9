//! Contributor identifiers.

use std::borrow::Borrow;
use std::str::FromStr;

use serde::Serialize;

use crate::error::HealthError;

/// Identifier of a health contributor (a database, a downstream service, ...).
///
/// Wraps the trimmed id string so contributor ids are not mixed up with
/// arbitrary strings. Ids are opaque: any non-blank text is accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContributorId(String);

impl ContributorId {
    /// Creates a contributor id, trimming surrounding whitespace.
    ///
    /// Returns [`HealthError::BlankContributorId`] if nothing remains.
    pub fn new(id: impl AsRef<str>) -> Result<Self, HealthError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(HealthError::BlankContributorId);
        }
        Ok(Self(id.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContributorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContributorId {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ContributorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContributorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
