//! Push-based health check fed by the component it describes.

use async_trait::async_trait;
use health::{ContributorId, Health};
use tokio::sync::watch;

use crate::check::CheckHealth;

/// Health check whose value is pushed by a matching [`HealthUpdater`].
///
/// Reads never block: the check returns the most recently published health.
#[derive(Debug, Clone)]
pub struct ReactiveHealthCheck {
    id: ContributorId,
    receiver: watch::Receiver<Health>,
}

impl ReactiveHealthCheck {
    /// Creates a check and its updater. The check reports `UNKNOWN` until the
    /// first update.
    pub fn new(id: ContributorId) -> (Self, HealthUpdater) {
        let (sender, receiver) = watch::channel(Health::unknown());
        let check = Self {
            id: id.clone(),
            receiver,
        };
        let updater = HealthUpdater {
            id,
            track_drop: true,
            sender,
        };
        (check, updater)
    }
}

#[async_trait]
impl CheckHealth for ReactiveHealthCheck {
    fn id(&self) -> &ContributorId {
        &self.id
    }

    async fn check_health(&self) -> Health {
        self.receiver.borrow().clone()
    }
}

/// Publishes health for a [`ReactiveHealthCheck`].
///
/// Dropping the updater marks the contributor `DOWN`, unless it was
/// [frozen](Self::freeze) first.
#[derive(Debug)]
pub struct HealthUpdater {
    id: ContributorId,
    track_drop: bool,
    sender: watch::Sender<Health>,
}

impl HealthUpdater {
    /// Publishes `health`, returning whether it differs from the previous value.
    pub fn update(&self, health: Health) -> bool {
        let previous = self.sender.send_replace(health.clone());
        if previous == health {
            return false;
        }
        tracing::debug!(
            component = %self.id,
            from = %previous.status,
            to = %health.status,
            "contributor health changed"
        );
        true
    }

    pub fn id(&self) -> &ContributorId {
        &self.id
    }

    /// Returns another check attached to this updater.
    pub fn subscribe(&self) -> ReactiveHealthCheck {
        ReactiveHealthCheck {
            id: self.id.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    /// Drops the updater while keeping the last published health.
    pub fn freeze(mut self) {
        self.track_drop = false;
    }
}

impl Drop for HealthUpdater {
    fn drop(&mut self) {
        if !self.track_drop {
            return;
        }
        let reason = if std::thread::panicking() {
            "component panicked"
        } else {
            "component stopped reporting"
        };
        self.update(Health::down().with_detail("reason", reason));
    }
}

#[cfg(test)]
mod tests {
    use health::Status;

    use super::*;

    fn id(raw: &str) -> ContributorId {
        ContributorId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn starts_unknown_and_follows_updates() {
        let (check, updater) = ReactiveHealthCheck::new(id("queue"));
        assert_eq!(check.check_health().await.status, Status::Unknown);

        assert!(updater.update(Health::up()));
        assert!(!updater.update(Health::up()));
        assert_eq!(check.check_health().await.status, Status::Up);

        assert!(updater.update(Health::up().with_detail("lag", 12)));
        let health = check.check_health().await;
        assert_eq!(health.details["lag"], 12);
        updater.freeze();
    }

    #[tokio::test]
    async fn dropped_updater_reports_down() {
        let (check, updater) = ReactiveHealthCheck::new(id("queue"));
        updater.update(Health::up());
        drop(updater);

        let health = check.check_health().await;
        assert_eq!(health.status, Status::Down);
        assert_eq!(health.details["reason"], "component stopped reporting");
    }

    #[tokio::test]
    async fn frozen_updater_keeps_last_health() {
        let (check, updater) = ReactiveHealthCheck::new(id("queue"));
        updater.update(Health::out_of_service());
        updater.freeze();

        assert_eq!(check.check_health().await.status, Status::OutOfService);
    }

    #[tokio::test]
    async fn subscribed_checks_share_updates() {
        let (_check, updater) = ReactiveHealthCheck::new(id("queue"));
        let other = updater.subscribe();
        updater.update(Health::up());

        assert_eq!(other.id().as_str(), "queue");
        assert_eq!(other.check_health().await.status, Status::Up);
        updater.freeze();
    }
}
