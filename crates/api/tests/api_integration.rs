//! Integration tests for the health endpoint server.

use std::sync::OnceLock;
use std::time::Duration;

use api::config::Config;
use api::policy::{HttpStatusMapping, ShowComponents};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use checks::{
    CheckHealth, HealthRegistry, HealthUpdater, PingCheck, ReactiveHealthCheck, RegistryConfig,
};
use health::{ContributorId, CriticalSet, Health};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Builds an app whose contributors report the given health values.
fn setup(config: Config, contributors: &[(&str, Health)]) -> (axum::Router, Vec<HealthUpdater>) {
    let mut registry = HealthRegistry::new(config.registry);
    let mut updaters = Vec::new();
    for (id, health) in contributors {
        let (check, updater) = ReactiveHealthCheck::new(ContributorId::new(id).unwrap());
        updater.update(health.clone());
        registry.insert(check).unwrap();
        updaters.push(updater);
    }
    let state = api::create_state(&config, registry);
    (api::create_app(state, get_metrics_handle()), updaters)
}

fn critical(ids: &str) -> Config {
    Config {
        critical: CriticalSet::parse(ids),
        ..Config::default()
    }
}

fn scenario_contributors() -> Vec<(&'static str, Health)> {
    vec![
        ("db", Health::up()),
        ("admin", Health::down()),
        ("cache", Health::up()),
    ]
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_critical_contributor_drives_overall_status() {
    let (app, _updaters) = setup(critical("admin"), &scenario_contributors());

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "status": "DOWN",
            "components": {
                "db": {"status": "UP"},
                "admin": {"status": "DOWN"},
                "cache": {"status": "UP"}
            }
        })
    );
}

#[tokio::test]
async fn test_non_critical_failure_keeps_overall_up() {
    let (app, _updaters) = setup(critical("db"), &scenario_contributors());

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "UP");
    assert_eq!(json["components"]["admin"]["status"], "DOWN");
}

#[tokio::test]
async fn test_unknown_critical_ids_fall_back_to_all_contributors() {
    let (app, _updaters) = setup(critical("nonexistent"), &scenario_contributors());

    let (_, json) = get(app, "/healthz").await;

    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["components"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_components_hidden_when_policy_is_never() {
    let config = Config {
        show_components: ShowComponents::Never,
        ..critical("admin")
    };
    let (app, _updaters) = setup(
        config,
        &[("db", Health::up()), ("admin", Health::up())],
    );

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "UP"}));
}

#[tokio::test]
async fn test_no_contributors_report_empty_default() {
    let (app, _updaters) = setup(critical("admin"), &[]);

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "UNKNOWN", "components": {}}));
}

#[tokio::test]
async fn test_details_are_rendered_per_component() {
    let (app, _updaters) = setup(
        critical("db"),
        &[(
            "db",
            Health::down().with_detail("error", "connection refused"),
        )],
    );

    let (_, json) = get(app, "/healthz").await;

    assert_eq!(
        json["components"]["db"],
        json!({"status": "DOWN", "details": {"error": "connection refused"}})
    );
}

#[tokio::test]
async fn test_severity_mapping_returns_service_unavailable() {
    let config = Config {
        http_status: HttpStatusMapping::Severity,
        ..critical("admin")
    };
    let (app, _updaters) = setup(config, &scenario_contributors());

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "DOWN");
}

#[tokio::test]
async fn test_when_authorized_requires_bearer_token() {
    let config = Config {
        show_components: ShowComponents::WhenAuthorized,
        auth_token: Some("s3cret".to_string()),
        ..critical("admin")
    };
    let (app, _updaters) = setup(config, &scenario_contributors());

    let (_, anonymous) = get(app.clone(), "/healthz").await;
    assert_eq!(anonymous, json!({"status": "DOWN"}));

    let request = Request::builder()
        .uri("/healthz")
        .header("authorization", "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let (_, authorized) = send(app, request).await;
    assert_eq!(authorized["status"], "DOWN");
    assert_eq!(authorized["components"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_status_follows_contributor_updates() {
    let (app, updaters) = setup(critical("admin"), &scenario_contributors());

    let (_, before) = get(app.clone(), "/healthz").await;
    assert_eq!(before["status"], "DOWN");

    let admin = updaters
        .iter()
        .find(|updater| updater.id().as_str() == "admin")
        .unwrap();
    admin.update(Health::up());

    let (_, after) = get(app, "/healthz").await;
    assert_eq!(after["status"], "UP");
}

#[tokio::test]
async fn test_single_component_endpoint() {
    let (app, _updaters) = setup(critical("admin"), &scenario_contributors());

    let (status, json) = get(app.clone(), "/healthz/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "UP"}));

    let (status, json) = get(app, "/healthz/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_single_component_hidden_when_components_hidden() {
    let config = Config {
        show_components: ShowComponents::Never,
        ..critical("admin")
    };
    let (app, _updaters) = setup(config, &scenario_contributors());

    let (status, _) = get(app, "/healthz/db").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_default_state_registers_ping() {
    let state = api::create_default_state(&Config::default()).unwrap();
    let app = api::create_app(state, get_metrics_handle());

    let (status, json) = get(app, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"status": "UP", "components": {"ping": {"status": "UP"}}})
    );
}

#[tokio::test]
async fn test_duplicate_check_ids_fail_state_creation() {
    let config = Config {
        tcp_checks: vec![api::config::TcpTarget {
            id: ContributorId::new(PingCheck::DEFAULT_ID).unwrap(),
            address: "127.0.0.1:5432".to_string(),
        }],
        ..Config::default()
    };

    assert!(api::create_default_state(&config).is_err());
}

/// Never completes, so the registry time limit always fires.
struct HangingCheck(ContributorId);

#[async_trait]
impl CheckHealth for HangingCheck {
    fn id(&self) -> &ContributorId {
        &self.0
    }

    async fn check_health(&self) -> Health {
        std::future::pending().await
    }
}

async fn metrics_text(app: axum::Router) -> String {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let config = Config {
        registry: RegistryConfig {
            timeout: Duration::from_millis(50),
            slow_threshold: Duration::from_millis(10),
        },
        ..critical("nonexistent")
    };
    let mut registry = HealthRegistry::new(config.registry);
    registry.insert(PingCheck::default()).unwrap();
    registry
        .insert(HangingCheck(ContributorId::new("stuck-broker").unwrap()))
        .unwrap();
    let state = api::create_state(&config, registry);
    let app = api::create_app(state, get_metrics_handle());

    let (_, json) = get(app.clone(), "/healthz").await;
    assert_eq!(json["status"], "DOWN");
    assert_eq!(json["components"]["stuck-broker"]["status"], "DOWN");

    let text = metrics_text(app).await;
    assert!(text.contains("healthz_requests_total"));
    assert!(text.contains("healthz_critical_fallback_total"));
    assert!(text.contains("health_check_timeouts_total{component=\"stuck-broker\"}"));
    assert!(text.contains("health_check_duration_seconds"));
    assert!(text.contains("component=\"ping\""));
}
