use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::client::JusticeGateway;
use super::constants::{CSV_CACHE_TTL, JUSTICE_OPENDATA_HOST, MAX_PDF_SIZE_MB, TEXT_PREVIEW_CHARS};
use super::csv_parser::{self, CompanyRecord};
use super::pdf::{self, detect_document_type, ParsedPdf};
use super::types::JusticeDocument;
use super::JusticeError;
use crate::cache::{CacheService, CacheStore};
use crate::config::JusticeConfig;
use crate::error::ValidationErrors;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Document parsing and cached open-data imports over a [`JusticeGateway`].
pub struct JusticeService<G> {
    gateway: Arc<G>,
    cache: CacheService,
    opendata_host: String,
    csv_ttl: Duration,
}

impl<G> JusticeService<G>
where
    G: JusticeGateway,
{
    pub fn new(gateway: Arc<G>, store: Arc<dyn CacheStore>, config: &JusticeConfig) -> Self {
        let opendata_host = Url::parse(&config.opendata_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| JUSTICE_OPENDATA_HOST.to_string());
        let csv_ttl = Duration::from_secs(CSV_CACHE_TTL);

        Self {
            gateway,
            cache: CacheService::new("justice", csv_ttl, store),
            opendata_host,
            csv_ttl,
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Download a filed PDF and return its detected type with a text preview.
    /// Parsed documents are not cached.
    pub async fn get_document(
        &self,
        ico: &str,
        document_id: &str,
    ) -> Result<JusticeDocument, JusticeError> {
        let downloaded = self.gateway.download_document(document_id).await?;

        let size_mb = downloaded.bytes.len() as f64 / BYTES_PER_MB;
        if size_mb > MAX_PDF_SIZE_MB as f64 {
            return Err(JusticeError::TooLarge {
                size_mb,
                max_mb: MAX_PDF_SIZE_MB,
            });
        }

        let ParsedPdf { text, tables } = pdf::parse(&downloaded.bytes)?;
        let document_type = detect_document_type(&text);
        tracing::info!(
            ico,
            document_id,
            document_type = document_type.as_str(),
            chars = text.chars().count(),
            tables = tables.len(),
            "Justice document parsed"
        );

        Ok(JusticeDocument {
            ico: ico.to_string(),
            document_id: document_id.to_string(),
            document_type,
            text_content: text.chars().take(TEXT_PREVIEW_CHARS).collect(),
            table_count: tables.len(),
            tables,
            source_url: downloaded.source_url,
        })
    }

    /// Company rows of an open-data CSV export, cached per dataset URL.
    pub async fn import_companies(
        &self,
        dataset_url: &str,
    ) -> Result<Vec<CompanyRecord>, JusticeError> {
        let url = self.validate_dataset_url(dataset_url)?;
        let hash = CacheService::hash_params(&serde_json::json!({ "url": url.as_str() }))?;
        if let Some(cached) = self.cache.get::<Vec<CompanyRecord>>(&["csv", &hash]) {
            return Ok(cached);
        }

        let raw = self.gateway.download_csv(&url).await?;
        let records = csv_parser::parse_all(&raw)?;
        self.cache
            .set(&records, &["csv", &hash], Some(self.csv_ttl))?;

        tracing::info!(url = %url, rows = records.len(), "Justice open data imported");
        Ok(records)
    }

    /// An absolute http(s) URL on the configured open-data host.
    pub fn validate_dataset_url(&self, raw: &str) -> Result<Url, ValidationErrors> {
        let url = Url::parse(raw.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ValidationErrors::single("dataset_url", "Enter a valid URL."))?;

        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.opendata_host) => Ok(url),
            _ => Err(ValidationErrors::single(
                "dataset_url",
                format!("URL must point to {}.", self.opendata_host),
            )),
        }
    }
}
