//! The health check interface.

use std::sync::Arc;

use async_trait::async_trait;
use health::{ContributorId, Health};

/// A single contributor's health check.
///
/// Implementations report failures through the returned [`Health`] (usually
/// [`health::Status::Down`] with an `error` detail) rather than by panicking.
#[async_trait]
pub trait CheckHealth: Send + Sync + 'static {
    /// Unique id of the contributor this check reports for.
    fn id(&self) -> &ContributorId;

    /// Runs the check.
    async fn check_health(&self) -> Health;
}

impl std::fmt::Debug for dyn CheckHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckHealth").field("id", self.id()).finish()
    }
}

#[async_trait]
impl<T: CheckHealth + ?Sized> CheckHealth for Arc<T> {
    fn id(&self) -> &ContributorId {
        (**self).id()
    }

    async fn check_health(&self) -> Health {
        (**self).check_health().await
    }
}
