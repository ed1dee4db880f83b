//! Downloads from the Justice registry: open-data exports from the
//! open-data portal and filed PDFs from the document collection.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use url::Url;

use super::constants::USER_AGENT as AGENT;
use super::JusticeError;
use crate::config::JusticeConfig;
use crate::error::ExternalApiError;

pub const SERVICE_NAME: &str = "justice";

/// PDF bytes together with the URL they were fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDocument {
    pub bytes: Vec<u8>,
    pub source_url: String,
}

#[async_trait]
pub trait JusticeGateway: Send + Sync {
    async fn download_csv(&self, dataset_url: &Url) -> Result<Vec<u8>, JusticeError>;

    async fn download_document(&self, document_id: &str)
        -> Result<DownloadedDocument, JusticeError>;
}

fn unavailable(message: &str) -> JusticeError {
    JusticeError::External(ExternalApiError::new(message, SERVICE_NAME))
}

/// `{base}/ias/content/download?id=<id>` with the id query-encoded.
pub fn document_url(base_url: &str, document_id: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("{}/ias/content/download", base_url.trim_end_matches('/')),
        &[("id", document_id)],
    )
}

#[derive(Debug, Clone)]
pub struct JusticeHttpClient {
    http: Client,
    base_url: String,
}

impl JusticeHttpClient {
    pub fn new(config: &JusticeConfig) -> Result<Self, JusticeError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| {
                tracing::error!(error = %err, "failed to build Justice HTTP client");
                unavailable("Justice client could not be initialised")
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl JusticeGateway for JusticeHttpClient {
    async fn download_csv(&self, dataset_url: &Url) -> Result<Vec<u8>, JusticeError> {
        let failed = |err: reqwest::Error| {
            tracing::warn!(url = %dataset_url, error = %err, "open data download failed");
            unavailable("Justice open data unavailable")
        };

        let response = self
            .http
            .get(dataset_url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?;
        let bytes = response.bytes().await.map_err(failed)?;
        Ok(bytes.to_vec())
    }

    async fn download_document(
        &self,
        document_id: &str,
    ) -> Result<DownloadedDocument, JusticeError> {
        let url = document_url(&self.base_url, document_id).map_err(|err| {
            tracing::warn!(document_id, error = %err, "document URL could not be built");
            unavailable("Justice document download failed")
        })?;
        let failed = |err: reqwest::Error| {
            tracing::warn!(%url, error = %err, "document download failed");
            unavailable("Justice document download failed")
        };

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.to_ascii_lowercase().contains("pdf") {
            tracing::warn!(%url, content_type, "document is not a PDF");
            return Err(unavailable(&format!("Expected PDF, got: {content_type}")));
        }

        let bytes = response.bytes().await.map_err(failed)?;
        Ok(DownloadedDocument {
            bytes: bytes.to_vec(),
            source_url: url.to_string(),
        })
    }
}
