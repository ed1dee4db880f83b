use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;
use url::Url;

use crate::cache::MemoryCacheStore;
use crate::config::JusticeConfig;
use crate::error::ExternalApiError;
use crate::justice::client::{document_url, DownloadedDocument, JusticeGateway};
use crate::justice::pdf::sample_pdf;
use crate::justice::{JusticeError, JusticeService};

pub(super) const DATASET_URL: &str =
    "https://dataor.justice.cz/api/file/sro-full-praha-2024.csv";

pub(super) const COMPANIES_CSV: &str = "ico,nazev,pravni_forma,sidlo\n\
27082440,Alza.cz a.s.,a.s.,Praha\n\
12345678,Test s.r.o.,s.r.o.,Brno\n";

/// Gateway double serving fixed bytes and recording each call.
pub(super) struct FakeJustice {
    csv: Result<Vec<u8>, ExternalApiError>,
    pdf: Result<Vec<u8>, ExternalApiError>,
    csv_calls: Mutex<Vec<String>>,
    document_calls: Mutex<Vec<String>>,
}

impl FakeJustice {
    pub(super) fn new() -> Self {
        Self::serving(
            COMPANIES_CSV.as_bytes().to_vec(),
            sample_pdf(&["ROZVAHA v plnem rozsahu", "Aktiva celkem"]),
        )
    }

    pub(super) fn serving(csv: Vec<u8>, pdf: Vec<u8>) -> Self {
        Self {
            csv: Ok(csv),
            pdf: Ok(pdf),
            csv_calls: Mutex::new(Vec::new()),
            document_calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn failing(error: ExternalApiError) -> Self {
        Self {
            csv: Err(error.clone()),
            pdf: Err(error),
            csv_calls: Mutex::new(Vec::new()),
            document_calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn csv_calls(&self) -> Vec<String> {
        self.csv_calls.lock().expect("lock").clone()
    }

    pub(super) fn document_calls(&self) -> Vec<String> {
        self.document_calls.lock().expect("lock").clone()
    }
}

#[async_trait]
impl JusticeGateway for FakeJustice {
    async fn download_csv(&self, dataset_url: &Url) -> Result<Vec<u8>, JusticeError> {
        self.csv_calls
            .lock()
            .expect("lock")
            .push(dataset_url.to_string());
        self.csv.clone().map_err(JusticeError::External)
    }

    async fn download_document(
        &self,
        document_id: &str,
    ) -> Result<DownloadedDocument, JusticeError> {
        self.document_calls
            .lock()
            .expect("lock")
            .push(document_id.to_string());
        let bytes = self.pdf.clone().map_err(JusticeError::External)?;
        let source_url = document_url("https://or.justice.cz", document_id)
            .expect("url")
            .to_string();
        Ok(DownloadedDocument { bytes, source_url })
    }
}

pub(super) fn build_service(gateway: Arc<FakeJustice>) -> Arc<JusticeService<FakeJustice>> {
    Arc::new(JusticeService::new(
        gateway,
        Arc::new(MemoryCacheStore::default()),
        &JusticeConfig::default(),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
