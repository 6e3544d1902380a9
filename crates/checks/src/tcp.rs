//! TCP reachability check for network dependencies.

use std::time::Duration;

use async_trait::async_trait;
use health::{ContributorId, Health};
use tokio::net::TcpStream;

use crate::check::CheckHealth;

/// Reports `UP` when a TCP connection to `address` can be opened.
#[derive(Debug, Clone)]
pub struct TcpCheck {
    id: ContributorId,
    address: String,
    connect_timeout: Duration,
}

impl TcpCheck {
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Creates a check for a `host:port` address.
    pub fn new(id: ContributorId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

#[async_trait]
impl CheckHealth for TcpCheck {
    fn id(&self) -> &ContributorId {
        &self.id
    }

    async fn check_health(&self) -> Health {
        let connect = TcpStream::connect(self.address.as_str());
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(_stream)) => Health::up().with_detail("address", self.address.as_str()),
            Ok(Err(err)) => Health::down()
                .with_detail("address", self.address.as_str())
                .with_detail("error", err.to_string()),
            Err(_) => Health::down()
                .with_detail("address", self.address.as_str())
                .with_detail(
                    "error",
                    format!("connect timed out after {:?}", self.connect_timeout),
                ),
        }
    }
}
