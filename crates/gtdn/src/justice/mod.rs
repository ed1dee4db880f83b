//! Czech Justice registry: filed PDFs from the document collection and
//! company exports from the open-data portal.

pub mod client;
pub mod constants;
pub mod csv_parser;
pub mod pdf;
pub mod router;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{DownloadedDocument, JusticeGateway, JusticeHttpClient};
pub use csv_parser::CompanyRecord;
pub use pdf::{DocumentType, ParsedPdf, Table};
pub use router::justice_router;
pub use service::JusticeService;
pub use types::JusticeDocument;

use crate::cache::CacheError;
use crate::error::{ExternalApiError, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum JusticeError {
    #[error(transparent)]
    External(#[from] ExternalApiError),
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("PDF too large: {size_mb:.1}MB (max {max_mb}MB)")]
    TooLarge { size_mb: f64, max_mb: usize },
    #[error("PDF could not be parsed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("CSV could not be parsed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
