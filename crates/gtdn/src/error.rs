use crate::ares::{AresApiError, AresServiceError};
use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::justice::JusticeError;
use crate::telemetry::TelemetryError;
use crate::throttle::ThrottleRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Failure reported by (or on the way to) a third-party service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{service}: {message}")]
pub struct ExternalApiError {
    pub message: String,
    pub status_code: Option<u16>,
    pub service: &'static str,
}

impl ExternalApiError {
    pub fn new(message: impl Into<String>, service: &'static str) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            service,
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Upstream status when known, otherwise 502.
    pub fn http_status(&self) -> StatusCode {
        self.status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

/// Field-keyed validation messages, serialized as `{"field": ["message"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    External(ExternalApiError),
    Validation(ValidationErrors),
    Throttled(ThrottleRejection),
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::External(err) => write!(f, "{}", err),
            AppError::Validation(err) => write!(f, "invalid input: {}", err),
            AppError::Throttled(err) => write!(f, "{}", err),
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Internal(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::External(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Throttled(err) => Some(err),
            AppError::BadRequest(_) | AppError::NotFound(_) | AppError::Internal(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::External(err) => {
                let status = err.http_status();
                let body = Json(json!({ "error": err.message, "service": err.service }));
                (status, body).into_response()
            }
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Throttled(rejection) => {
                let seconds = rejection.wait_seconds();
                let body = Json(json!({
                    "detail": format!(
                        "Request was throttled. Expected available in {seconds} seconds."
                    ),
                }));
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, seconds.to_string())],
                    body,
                )
                    .into_response()
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
            other @ (AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_)) => {
                let body = Json(json!({ "error": other.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ExternalApiError> for AppError {
    fn from(value: ExternalApiError) -> Self {
        Self::External(value)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<ThrottleRejection> for AppError {
    fn from(value: ThrottleRejection) -> Self {
        Self::Throttled(value)
    }
}

impl From<AresApiError> for AppError {
    fn from(value: AresApiError) -> Self {
        Self::External(value.into())
    }
}

impl From<AresServiceError> for AppError {
    fn from(value: AresServiceError) -> Self {
        match value {
            AresServiceError::Validation(errors) => Self::Validation(errors),
            AresServiceError::Upstream(err) => Self::External(err.into()),
            AresServiceError::Cache(err) => Self::from(err),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(value: CacheError) -> Self {
        tracing::error!(error = %value, "cache write failed");
        Self::Internal("Internal server error".to_string())
    }
}

impl From<JusticeError> for AppError {
    fn from(value: JusticeError) -> Self {
        match value {
            JusticeError::External(err) => Self::External(err),
            JusticeError::Validation(errors) => Self::Validation(errors),
            other @ (JusticeError::TooLarge { .. } | JusticeError::Pdf(_)) => {
                Self::BadRequest(other.to_string())
            }
            JusticeError::Csv(err) => Self::External(ExternalApiError::new(
                format!("Justice open data could not be parsed: {err}"),
                "justice",
            )),
            JusticeError::Cache(err) => Self::from(err),
        }
    }
}
