//! Health check execution.
//!
//! Contributors implement [`CheckHealth`]; a [`HealthRegistry`] runs all of
//! them concurrently for each health request, bounding every check with a
//! time limit, and hands the resulting [`health::Contributions`] to the
//! aggregator. A failing or hanging check always surfaces as a `DOWN`
//! contribution, never as an error.

pub mod check;
pub mod error;
pub mod ping;
pub mod reactive;
pub mod registry;
pub mod tcp;

pub use check::CheckHealth;
pub use error::{CheckError, Result};
pub use ping::PingCheck;
pub use reactive::{HealthUpdater, ReactiveHealthCheck};
pub use registry::{HealthRegistry, RegistryConfig};
pub use tcp::TcpCheck;
