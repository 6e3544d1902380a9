//! Per-request health response policies.

use std::str::FromStr;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use health::Status;

/// Who gets to see the per-component detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowComponents {
    /// Every caller sees the components.
    #[default]
    Always,
    /// Components are never shown.
    Never,
    /// Only callers presenting the configured bearer token see components.
    WhenAuthorized,
}

impl ShowComponents {
    /// Decides whether the request described by `headers` may see components.
    ///
    /// `WhenAuthorized` without a configured token never shows components.
    pub fn allows(self, headers: &HeaderMap, token: Option<&str>) -> bool {
        match self {
            ShowComponents::Always => true,
            ShowComponents::Never => false,
            ShowComponents::WhenAuthorized => token.is_some_and(|token| has_bearer(headers, token)),
        }
    }
}

fn has_bearer(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().split_once(char::is_whitespace))
        .is_some_and(|(scheme, presented)| {
            scheme.eq_ignore_ascii_case("bearer") && presented.trim() == token
        })
}

impl FromStr for ShowComponents {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "always" => Ok(ShowComponents::Always),
            "never" => Ok(ShowComponents::Never),
            "when-authorized" => Ok(ShowComponents::WhenAuthorized),
            other => Err(format!(
                "expected one of always, never, when-authorized; got '{other}'"
            )),
        }
    }
}

/// How the overall status is reflected in the HTTP status code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpStatusMapping {
    /// Always `200 OK`; health is only reported in the body.
    #[default]
    Fixed,
    /// `503 Service Unavailable` for `DOWN` and `OUT_OF_SERVICE`.
    Severity,
}

impl HttpStatusMapping {
    pub fn status_code(self, status: Status) -> StatusCode {
        match (self, status) {
            (HttpStatusMapping::Severity, Status::Down | Status::OutOfService) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::OK,
        }
    }
}

impl FromStr for HttpStatusMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(HttpStatusMapping::Fixed),
            "severity" => Ok(HttpStatusMapping::Severity),
            other => Err(format!("expected fixed or severity; got '{other}'")),
        }
    }
}
