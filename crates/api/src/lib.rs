//! HTTP health endpoint aggregating contributor checks.
//!
//! `GET /healthz` runs every registered check and reports an overall status
//! driven by the configured critical contributors, together with the full
//! per-component detail when the caller may see it. Structured logging
//! (tracing) and Prometheus metrics are wired in as for any other service.

pub mod config;
pub mod error;
pub mod policy;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use checks::{HealthRegistry, PingCheck, TcpCheck};
use health::{ContributorId, StatusAggregator};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::ConfigError;
use policy::ShowComponents;
use routes::health::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/healthz", get(routes::health::check))
        .route("/healthz/{component}", get(routes::health::component))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with the built-in checks described by `config`.
pub fn create_default_state(config: &Config) -> Result<Arc<AppState>, ConfigError> {
    let mut registry = HealthRegistry::new(config.registry);
    registry.insert(PingCheck::default())?;
    for target in &config.tcp_checks {
        registry.insert(TcpCheck::new(target.id.clone(), target.address.clone()))?;
    }
    Ok(create_state(config, registry))
}

/// Creates the application state around an already populated registry.
pub fn create_state(config: &Config, registry: HealthRegistry) -> Arc<AppState> {
    if config.show_components == ShowComponents::WhenAuthorized && config.auth_token.is_none() {
        tracing::warn!("HEALTHZ_AUTH_TOKEN is not set, health components will never be shown");
    }

    let aggregator = StatusAggregator::new(config.critical.clone(), config.status_order.clone());
    for id in aggregator.critical().iter() {
        if !registry.contains(id.as_str()) {
            tracing::warn!(component = %id, "critical contributor has no registered health check");
        }
    }
    let registered: Vec<&str> = registry.ids().map(ContributorId::as_str).collect();
    tracing::info!(
        checks = ?registered,
        critical = %aggregator.critical(),
        "health registry ready"
    );

    Arc::new(AppState {
        registry,
        aggregator,
        show_components: config.show_components,
        auth_token: config.auth_token.clone(),
        http_status: config.http_status,
    })
}
