//! Health model error types.

use thiserror::Error;

use crate::status::Status;

/// Errors raised while building health configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HealthError {
    /// The status code does not name a known status.
    #[error("Unknown status code: '{0}'")]
    UnknownStatus(String),

    /// A status appears more than once in a severity order.
    #[error("Status {0} is listed more than once in the status order")]
    DuplicateStatus(Status),

    /// A contributor id was empty after trimming.
    #[error("Contributor id must not be blank")]
    BlankContributorId,
}

/// Convenience type alias for health model results.
pub type Result<T> = std::result::Result<T, HealthError>;
