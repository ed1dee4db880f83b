//! HTTP access to the ARES REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{AresApiEkonomickySubjekt, AresApiSearchRequest, AresApiSearchResponse};
use crate::config::AresConfig;
use crate::error::ExternalApiError;

pub const SERVICE_NAME: &str = "ares";

/// Upstream operations the service layer depends on.
#[async_trait]
pub trait AresGateway: Send + Sync {
    async fn search(
        &self,
        request: &AresApiSearchRequest,
    ) -> Result<AresApiSearchResponse, AresApiError>;

    async fn get_by_ico(&self, ico: &str) -> Result<AresApiEkonomickySubjekt, AresApiError>;
}

/// Classification of a non-success HTTP status returned by ARES.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AresStatusKind {
    InvalidRequest,
    NotFound,
    RateLimited,
    Unavailable,
    Other,
}

impl AresStatusKind {
    /// `None` for 2xx statuses.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(Self::InvalidRequest),
            404 => Some(Self::NotFound),
            429 => Some(Self::RateLimited),
            500..=u16::MAX => Some(Self::Unavailable),
            _ => Some(Self::Other),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request parameters",
            Self::NotFound => "Economic subject not found",
            Self::RateLimited => "Too many requests. Please try again later.",
            Self::Unavailable => "ARES service is temporarily unavailable",
            Self::Other => "ARES API error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AresApiError {
    #[error("{}", .kind.message())]
    Status { kind: AresStatusKind, status: u16 },
    #[error("Unable to connect to ARES service")]
    Connect,
    #[error("Failed to make request to ARES")]
    Request,
    #[error("Unexpected response from ARES")]
    Decode,
    #[error("Invalid ICO format. ICO must be 8 digits.")]
    InvalidIco,
    #[error("ARES rate limit reached. Please try again in a minute.")]
    OutboundLimit,
}

impl AresApiError {
    pub fn from_status(status: u16) -> Option<Self> {
        AresStatusKind::from_status(status).map(|kind| Self::Status { kind, status })
    }

    /// HTTP status to report to our own clients, when one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::InvalidIco => Some(400),
            Self::OutboundLimit => Some(429),
            Self::Connect | Self::Request | Self::Decode => None,
        }
    }
}

impl From<AresApiError> for ExternalApiError {
    fn from(value: AresApiError) -> Self {
        let status = value.status_code();
        let error = ExternalApiError::new(value.to_string(), SERVICE_NAME);
        match status {
            Some(code) => error.with_status(code),
            None => error,
        }
    }
}

fn transport_error(err: &reqwest::Error) -> AresApiError {
    if err.is_connect() || err.is_timeout() {
        AresApiError::Connect
    } else if err.is_decode() {
        AresApiError::Decode
    } else {
        AresApiError::Request
    }
}

/// Left-pad to eight characters and require eight ASCII digits.
pub fn normalize_ico(raw: &str) -> Result<String, AresApiError> {
    let raw = raw.trim();
    let normalized = format!("{raw:0>8}");
    if normalized.len() == 8 && normalized.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(normalized)
    } else {
        Err(AresApiError::InvalidIco)
    }
}

/// Pooled reqwest client bound to one ARES base URL.
#[derive(Debug, Clone)]
pub struct AresHttpClient {
    http: Client,
    base_url: String,
}

impl AresHttpClient {
    pub fn new(config: &AresConfig) -> Result<Self, AresApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                tracing::error!(error = %err, "failed to build ARES HTTP client");
                AresApiError::Request
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        sent: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, AresApiError> {
        let response = sent.map_err(|err| {
            let mapped = transport_error(&err);
            tracing::warn!(operation, error = %err, "ARES request failed");
            mapped
        })?;

        let status = response.status().as_u16();
        if let Some(err) = AresApiError::from_status(status) {
            tracing::warn!(operation, status, "ARES answered with an error status");
            return Err(err);
        }

        response.json::<T>().await.map_err(|err| {
            tracing::warn!(operation, error = %err, "ARES response could not be decoded");
            if err.is_decode() {
                AresApiError::Decode
            } else {
                transport_error(&err)
            }
        })
    }
}

#[async_trait]
impl AresGateway for AresHttpClient {
    async fn search(
        &self,
        request: &AresApiSearchRequest,
    ) -> Result<AresApiSearchResponse, AresApiError> {
        let url = format!("{}/vyhledat", self.base_url);
        let sent = self.http.post(&url).json(request).send().await;
        self.read("search", sent).await
    }

    async fn get_by_ico(&self, ico: &str) -> Result<AresApiEkonomickySubjekt, AresApiError> {
        let url = format!("{}/{}", self.base_url, ico);
        let sent = self.http.get(&url).send().await;
        self.read("get_by_ico", sent).await
    }
}
