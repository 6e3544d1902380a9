//! Health check endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use checks::HealthRegistry;
use health::{
    AggregateResult, AggregationBasis, ContributorStatus, CriticalSet, Status, StatusAggregator,
};

use crate::error::ApiError;
use crate::policy::{HttpStatusMapping, ShowComponents};

/// Shared state for the health handlers.
pub struct AppState {
    pub registry: HealthRegistry,
    pub aggregator: StatusAggregator,
    pub show_components: ShowComponents,
    pub auth_token: Option<String>,
    pub http_status: HttpStatusMapping,
}

impl AppState {
    fn shows_components(&self, headers: &HeaderMap) -> bool {
        self.show_components.allows(headers, self.auth_token.as_deref())
    }
}

/// GET /healthz — runs every check and returns the aggregated health.
pub async fn check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<AggregateResult>) {
    let show_components = state.shows_components(&headers);
    let contributions = state.registry.check_all().await;
    let result = state.aggregator.aggregate(contributions, show_components);

    record(&state, &result);
    (state.http_status.status_code(result.status()), Json(result))
}

/// GET /healthz/{component} — runs a single check.
pub async fn component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ContributorStatus>), ApiError> {
    let not_found = || ApiError::NotFound(format!("Health component not found: {id}"));
    if !state.shows_components(&headers) {
        return Err(not_found());
    }

    let status = state.registry.check_one(&id).await.ok_or_else(not_found)?;
    Ok((state.http_status.status_code(status.status()), Json(status)))
}

fn record(state: &AppState, result: &AggregateResult) {
    let status = result.status();
    metrics::counter!("healthz_requests_total", "status" => status.code()).increment(1);

    if is_critical_fallback(state.aggregator.critical(), result) {
        metrics::counter!("healthz_critical_fallback_total").increment(1);
        tracing::debug!(
            critical = %state.aggregator.critical(),
            "no critical contributor is registered, overall status ranked over all contributors"
        );
    }

    if status == Status::Up {
        tracing::debug!(%status, components = result.component_count(), "health checked");
    } else {
        tracing::warn!(%status, components = result.component_count(), "application is not healthy");
    }
}

/// A configured critical list that matched no registered contributor.
///
/// An empty critical list ranks all contributors by design and is not a fallback.
fn is_critical_fallback(critical: &CriticalSet, result: &AggregateResult) -> bool {
    result.basis() == AggregationBasis::AllContributors && !critical.is_empty()
}

#[cfg(test)]
mod tests {
    use health::{ContributorId, Contributions, Health, StatusOrder, aggregate};

    use super::*;

    fn contributions() -> Contributions {
        [("db", Health::up()), ("admin", Health::down())]
            .into_iter()
            .map(|(id, health)| ContributorStatus::new(ContributorId::new(id).unwrap(), health))
            .collect()
    }

    fn fallback_for(critical: &str) -> bool {
        let critical = CriticalSet::parse(critical);
        let result = aggregate(contributions(), &critical, &StatusOrder::default(), false);
        is_critical_fallback(&critical, &result)
    }

    #[test]
    fn stale_critical_list_counts_as_fallback() {
        assert!(fallback_for("nonexistent"));
    }

    #[test]
    fn matched_critical_list_is_not_a_fallback() {
        assert!(!fallback_for("admin"));
    }

    #[test]
    fn empty_critical_list_is_not_a_fallback() {
        assert!(!fallback_for(""));
    }
}
