//! Liveness contributor that is always up.

use async_trait::async_trait;
use health::{ContributorId, Health};

use crate::check::CheckHealth;

/// Reports `UP` whenever the process is able to answer.
#[derive(Debug, Clone)]
pub struct PingCheck {
    id: ContributorId,
}

impl PingCheck {
    pub const DEFAULT_ID: &'static str = "ping";

    pub fn new(id: ContributorId) -> Self {
        Self { id }
    }
}

impl Default for PingCheck {
    fn default() -> Self {
        Self {
            id: ContributorId::new(Self::DEFAULT_ID).expect("default ping id is not blank"),
        }
    }
}

#[async_trait]
impl CheckHealth for PingCheck {
    fn id(&self) -> &ContributorId {
        &self.id
    }

    async fn check_health(&self) -> Health {
        Health::up()
    }
}
