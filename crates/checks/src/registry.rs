//! Registry that runs every contributor check for a health request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future;
use health::{ContributorId, ContributorStatus, Contributions, Health};

use crate::check::CheckHealth;
use crate::error::{CheckError, Result};

/// Time limits applied to each check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Hard limit; a check still running after it is reported `DOWN`.
    pub timeout: Duration,
    /// Checks slower than this are logged.
    pub slow_threshold: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            slow_threshold: Duration::from_secs(3),
        }
    }
}

/// Set of registered health checks, keyed by contributor id.
///
/// Filled at startup and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct HealthRegistry {
    checks: Vec<Arc<dyn CheckHealth>>,
    config: RegistryConfig,
}

impl HealthRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            checks: Vec::new(),
            config,
        }
    }

    /// Registers a check.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::RedefinedComponent`] if a check with the same id
    /// is already registered.
    pub fn insert(&mut self, check: impl CheckHealth) -> Result<()> {
        self.insert_shared(Arc::new(check))
    }

    /// Registers a check that is also held elsewhere.
    pub fn insert_shared(&mut self, check: Arc<dyn CheckHealth>) -> Result<()> {
        if self.contains(check.id().as_str()) {
            return Err(CheckError::RedefinedComponent(check.id().clone()));
        }
        tracing::debug!(component = %check.id(), "registered health check");
        self.checks.push(check);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.checks.iter().any(|check| check.id().as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ContributorId> {
        self.checks.iter().map(|check| check.id())
    }

    /// Runs every registered check concurrently.
    ///
    /// The result holds exactly one entry per registered check; checks that
    /// exceed the timeout are reported `DOWN`.
    pub async fn check_all(&self) -> Contributions {
        let runs = self
            .checks
            .iter()
            .map(|check| run_with_time_limit(check.as_ref(), self.config));
        future::join_all(runs).await.into_iter().collect()
    }

    /// Runs the check registered under `id`, if any.
    pub async fn check_one(&self, id: &str) -> Option<ContributorStatus> {
        let check = self.checks.iter().find(|check| check.id().as_str() == id)?;
        Some(run_with_time_limit(check.as_ref(), self.config).await)
    }
}

async fn run_with_time_limit(check: &dyn CheckHealth, config: RegistryConfig) -> ContributorStatus {
    let id = check.id();
    let started_at = Instant::now();
    let result = tokio::time::timeout(config.timeout, check.check_health()).await;
    let elapsed = started_at.elapsed();

    metrics::histogram!("health_check_duration_seconds", "component" => id.to_string())
        .record(elapsed.as_secs_f64());

    let health = match result {
        Ok(health) => {
            if elapsed > config.slow_threshold {
                tracing::warn!(
                    component = %id,
                    ?elapsed,
                    threshold = ?config.slow_threshold,
                    "health check is slow"
                );
            }
            health
        }
        Err(_) => {
            tracing::warn!(
                component = %id,
                timeout = ?config.timeout,
                "health check timed out, marking as down"
            );
            metrics::counter!("health_check_timeouts_total", "component" => id.to_string())
                .increment(1);
            Health::down().with_detail(
                "error",
                format!("health check timed out after {:?}", config.timeout),
            )
        }
    };

    ContributorStatus::new(id.clone(), health)
}
