//! Check registry error types.

use health::ContributorId;
use thiserror::Error;

/// Errors that can occur while registering health checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    /// A check with the same contributor id is already registered.
    #[error("Cannot register health check '{0}': component is already defined")]
    RedefinedComponent(ContributorId),
}

/// Convenience type alias for check registry results.
pub type Result<T> = std::result::Result<T, CheckError>;
