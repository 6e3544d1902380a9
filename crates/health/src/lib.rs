//! Health status model and critical-contributor aggregation.
//!
//! This crate is pure and synchronous: it ranks already-collected contributor
//! statuses and never performs I/O. Running the checks that produce
//! [`Contributions`] is the job of the `checks` crate.

pub mod aggregator;
pub mod contribution;
pub mod critical;
pub mod error;
pub mod status;
pub mod types;

pub use aggregator::{AggregateResult, AggregationBasis, StatusAggregator, aggregate};
pub use contribution::{ContributorStatus, Contributions, Details, Health};
pub use critical::CriticalSet;
pub use error::{HealthError, Result};
pub use status::{Status, StatusOrder};
pub use types::ContributorId;
