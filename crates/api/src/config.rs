//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use checks::RegistryConfig;
use health::{ContributorId, CriticalSet, Status, StatusOrder};

use crate::error::ConfigError;
use crate::policy::{HttpStatusMapping, ShowComponents};

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected pretty or json; got '{other}'")),
        }
    }
}

/// A TCP dependency to check, configured as `id=host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpTarget {
    pub id: ContributorId,
    pub address: String,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
/// - `HEALTHZ_CRITICAL` — comma-separated critical contributor ids (default: none)
/// - `HEALTHZ_STATUS_ORDER` — statuses most severe first (default: `DOWN,OUT_OF_SERVICE,UNKNOWN,UP`)
/// - `HEALTHZ_EMPTY_STATUS` — status when there is nothing to rank (default: `UNKNOWN`)
/// - `HEALTHZ_SHOW_COMPONENTS` — `always`, `never` or `when-authorized` (default: `always`)
/// - `HEALTHZ_AUTH_TOKEN` — bearer token for `when-authorized`
/// - `HEALTHZ_HTTP_STATUS` — `fixed` or `severity` (default: `fixed`)
/// - `HEALTHZ_CHECK_TIMEOUT_MS` — per-check time limit (default: `10000`)
/// - `HEALTHZ_SLOW_THRESHOLD_MS` — slow check logging threshold, below the timeout (default: `3000`)
/// - `HEALTHZ_TCP_CHECKS` — `id=host:port` pairs, comma-separated
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub critical: CriticalSet,
    pub status_order: StatusOrder,
    pub show_components: ShowComponents,
    pub auth_token: Option<String>,
    pub http_status: HttpStatusMapping,
    pub registry: RegistryConfig,
    pub tcp_checks: Vec<TcpTarget>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|err| ConfigError::invalid("PORT", &raw, err))?,
            None => defaults.port,
        };

        let empty_status = match var("HEALTHZ_EMPTY_STATUS") {
            Some(raw) => raw
                .parse::<Status>()
                .map_err(|err| ConfigError::health("HEALTHZ_EMPTY_STATUS", &raw, err))?,
            None => defaults.status_order.empty_default(),
        };
        let status_order = match var("HEALTHZ_STATUS_ORDER") {
            Some(raw) => StatusOrder::parse(&raw, empty_status)
                .map_err(|err| ConfigError::health("HEALTHZ_STATUS_ORDER", &raw, err))?,
            None => defaults.status_order.with_empty_default(empty_status),
        };

        let registry = RegistryConfig {
            timeout: parse_millis(var("HEALTHZ_CHECK_TIMEOUT_MS"), "HEALTHZ_CHECK_TIMEOUT_MS")?
                .unwrap_or(defaults.registry.timeout),
            slow_threshold: parse_millis(
                var("HEALTHZ_SLOW_THRESHOLD_MS"),
                "HEALTHZ_SLOW_THRESHOLD_MS",
            )?
            .unwrap_or(defaults.registry.slow_threshold),
        };
        if registry.slow_threshold >= registry.timeout {
            return Err(ConfigError::invalid(
                "HEALTHZ_SLOW_THRESHOLD_MS",
                &registry.slow_threshold.as_millis().to_string(),
                format!(
                    "must be less than HEALTHZ_CHECK_TIMEOUT_MS ({})",
                    registry.timeout.as_millis()
                ),
            ));
        }

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parse_with(var("LOG_FORMAT"), "LOG_FORMAT")?
                .unwrap_or(defaults.log_format),
            critical: var("HEALTHZ_CRITICAL")
                .map(|raw| CriticalSet::parse(&raw))
                .unwrap_or(defaults.critical),
            status_order,
            show_components: parse_with(var("HEALTHZ_SHOW_COMPONENTS"), "HEALTHZ_SHOW_COMPONENTS")?
                .unwrap_or(defaults.show_components),
            auth_token: var("HEALTHZ_AUTH_TOKEN").map(|token| token.trim().to_string()),
            http_status: parse_with(var("HEALTHZ_HTTP_STATUS"), "HEALTHZ_HTTP_STATUS")?
                .unwrap_or(defaults.http_status),
            registry,
            tcp_checks: match var("HEALTHZ_TCP_CHECKS") {
                Some(raw) => parse_tcp_targets(&raw)?,
                None => defaults.tcp_checks,
            },
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            critical: CriticalSet::new(),
            status_order: StatusOrder::default(),
            show_components: ShowComponents::default(),
            auth_token: None,
            http_status: HttpStatusMapping::default(),
            registry: RegistryConfig::default(),
            tcp_checks: Vec::new(),
        }
    }
}

fn parse_with<T>(raw: Option<String>, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = String>,
{
    raw.map(|raw| raw.parse().map_err(|err: String| ConfigError::invalid(var, &raw, err)))
        .transpose()
}

fn parse_millis(raw: Option<String>, var: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let millis: u64 = raw
        .trim()
        .parse()
        .map_err(|err| ConfigError::invalid(var, &raw, err))?;
    if millis == 0 {
        return Err(ConfigError::invalid(var, &raw, "must be greater than zero"));
    }
    Ok(Some(Duration::from_millis(millis)))
}

fn parse_tcp_targets(raw: &str) -> Result<Vec<TcpTarget>, ConfigError> {
    const VAR: &str = "HEALTHZ_TCP_CHECKS";

    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, address) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::invalid(VAR, entry, "expected id=host:port"))?;
            let id = ContributorId::new(id).map_err(|err| ConfigError::health(VAR, entry, err))?;
            let address = address.trim();
            if !address.contains(':') {
                return Err(ConfigError::invalid(VAR, entry, "address must be host:port"));
            }
            Ok(TcpTarget {
                id,
                address: address.to_string(),
            })
        })
        .collect()
}
