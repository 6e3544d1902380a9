//! Critical-contributor status aggregation.
//!
//! The overall status is the worst status among contributors named in the
//! [`CriticalSet`]. When none of the critical ids match a live contributor
//! (including an empty critical set), the overall status is ranked over all
//! contributors instead, so a stale critical list cannot hide failures.
//!
//! Which contributors are shown never depends on the critical set.

use serde::Serialize;

use crate::contribution::{ContributorStatus, Contributions};
use crate::critical::CriticalSet;
use crate::status::{Status, StatusOrder};

/// Which contributors the overall status was ranked over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationBasis {
    /// At least one critical contributor was present; only those counted.
    Critical,
    /// No critical contributor was present; every contributor counted.
    AllContributors,
}

/// Overall status plus the (optionally suppressed) component detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Contributions>,
    #[serde(skip)]
    basis: AggregationBasis,
}

impl AggregateResult {
    pub fn status(&self) -> Status {
        self.status
    }

    /// Component detail, or `None` when it was suppressed.
    pub fn components(&self) -> Option<&Contributions> {
        self.components.as_ref()
    }

    /// Number of components carried by the result.
    pub fn component_count(&self) -> usize {
        self.components.as_ref().map_or(0, Contributions::len)
    }

    pub fn basis(&self) -> AggregationBasis {
        self.basis
    }

    /// Consumes the result, returning the component detail.
    pub fn into_components(self) -> Option<Contributions> {
        self.components
    }
}

/// Aggregates contributor statuses according to a fixed critical set.
///
/// Holds only immutable configuration, so one instance can be shared by all
/// requests.
#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    critical: CriticalSet,
    order: StatusOrder,
}

impl StatusAggregator {
    pub fn new(critical: CriticalSet, order: StatusOrder) -> Self {
        Self { critical, order }
    }

    pub fn critical(&self) -> &CriticalSet {
        &self.critical
    }

    pub fn order(&self) -> &StatusOrder {
        &self.order
    }

    /// Computes the overall status of `contributions`.
    ///
    /// With `show_components` the contributions are returned unchanged in the
    /// result; otherwise they are dropped.
    pub fn aggregate(&self, contributions: Contributions, show_components: bool) -> AggregateResult {
        aggregate(contributions, &self.critical, &self.order, show_components)
    }

    /// Overall status only, without building a result.
    pub fn overall_status(&self, contributions: &Contributions) -> (Status, AggregationBasis) {
        overall_status(contributions, &self.critical, &self.order)
    }
}

/// Aggregates `contributions` against an explicit critical set and order.
pub fn aggregate(
    contributions: Contributions,
    critical: &CriticalSet,
    order: &StatusOrder,
    show_components: bool,
) -> AggregateResult {
    let (status, basis) = overall_status(&contributions, critical, order);
    AggregateResult {
        status,
        components: show_components.then_some(contributions),
        basis,
    }
}

fn overall_status(
    contributions: &Contributions,
    critical: &CriticalSet,
    order: &StatusOrder,
) -> (Status, AggregationBasis) {
    let critical_statuses: Vec<Status> = contributions
        .iter()
        .filter(|contributor| critical.contains(contributor.id().as_str()))
        .map(ContributorStatus::status)
        .collect();

    if critical_statuses.is_empty() {
        let status = order.rank(contributions.iter().map(ContributorStatus::status));
        (status, AggregationBasis::AllContributors)
    } else {
        (order.rank(critical_statuses), AggregationBasis::Critical)
    }
}
