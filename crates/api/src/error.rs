//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checks::CheckError;
use health::HealthError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

/// Errors raised while loading configuration or assembling the server.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// An environment variable holds a status or contributor id the health
    /// model rejects.
    #[error("Invalid value '{value}' for {var}: {source}")]
    Health {
        var: &'static str,
        value: String,
        #[source]
        source: HealthError,
    },

    /// A health check could not be registered.
    #[error("Health check registration failed: {0}")]
    Check(#[from] CheckError),
}

impl ConfigError {
    pub(crate) fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn health(var: &'static str, value: &str, source: HealthError) -> Self {
        ConfigError::Health {
            var,
            value: value.to_string(),
            source,
        }
    }

    /// The environment variable the error is about, if any.
    pub fn var(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidValue { var, .. } | ConfigError::Health { var, .. } => Some(var),
            ConfigError::Check(_) => None,
        }
    }
}
