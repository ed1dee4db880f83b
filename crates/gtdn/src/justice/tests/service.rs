use super::common::*;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::cache::CacheService;
use crate::error::{AppError, ExternalApiError};
use crate::justice::csv_parser::CompanyRecord;
use crate::justice::pdf::{sample_pdf, sample_pdf_placed};
use crate::justice::{DocumentType, JusticeError};

#[tokio::test]
async fn document_is_downloaded_parsed_and_typed() {
    let gateway = Arc::new(FakeJustice::new());
    let service = build_service(gateway.clone());

    let document = service
        .get_document("27082440", "doc-1")
        .await
        .expect("document");

    assert_eq!(gateway.document_calls(), vec!["doc-1".to_string()]);
    assert_eq!(document.ico, "27082440");
    assert_eq!(document.document_id, "doc-1");
    assert_eq!(document.document_type, DocumentType::BalanceSheet);
    assert!(document.text_content.contains("Aktiva celkem"));
    assert_eq!(
        document.source_url,
        "https://or.justice.cz/ias/content/download?id=doc-1"
    );
}

#[tokio::test]
async fn document_carries_tables_found_in_the_statement() {
    let statement = sample_pdf_placed(&[vec![
        (72, 760, "VYKAZ ZISKU A ZTRATY"),
        (72, 700, "I."),
        (200, 700, "Trzby z prodeje vyrobku"),
        (450, 700, "8 412"),
        (72, 680, "A."),
        (200, 680, "Vykonova spotreba"),
        (450, 680, "5 107"),
    ]]);
    let gateway = Arc::new(FakeJustice::serving(Vec::new(), statement));
    let service = build_service(gateway);

    let document = service
        .get_document("27082440", "doc-2")
        .await
        .expect("document");

    assert_eq!(document.document_type, DocumentType::ProfitLoss);
    assert_eq!(document.table_count, 1);
    assert_eq!(document.tables[0].len(), 2);
    assert_eq!(
        document.tables[0][1],
        vec!["A.".to_string(), "Vykonova spotreba".to_string(), "5 107".to_string()]
    );
}

#[tokio::test]
async fn documents_are_not_cached() {
    let gateway = Arc::new(FakeJustice::new());
    let service = build_service(gateway.clone());

    service.get_document("27082440", "doc-1").await.expect("first");
    service.get_document("27082440", "doc-1").await.expect("second");

    assert_eq!(gateway.document_calls().len(), 2);
}

#[tokio::test]
async fn text_preview_is_truncated() {
    let long_line = "A".repeat(12_000);
    let gateway = Arc::new(FakeJustice::serving(
        Vec::new(),
        sample_pdf(&[long_line.as_str()]),
    ));
    let service = build_service(gateway);

    let document = service
        .get_document("27082440", "doc-1")
        .await
        .expect("document");

    assert_eq!(document.text_content.chars().count(), 10_000);
    assert_eq!(document.document_type, DocumentType::Unknown);
}

#[tokio::test]
async fn oversized_pdf_is_rejected_before_parsing() {
    let gateway = Arc::new(FakeJustice::serving(
        Vec::new(),
        vec![0_u8; 51 * 1024 * 1024],
    ));
    let service = build_service(gateway);

    let error = service
        .get_document("27082440", "doc-1")
        .await
        .expect_err("too large");

    assert!(matches!(error, JusticeError::TooLarge { max_mb: 50, .. }));
    assert_eq!(error.to_string(), "PDF too large: 51.0MB (max 50MB)");
    let response = AppError::from(error).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreadable_pdf_answers_bad_request() {
    let gateway = Arc::new(FakeJustice::serving(Vec::new(), b"<html>".to_vec()));
    let service = build_service(gateway);

    let error = service
        .get_document("27082440", "doc-1")
        .await
        .expect_err("not a pdf");

    assert!(matches!(error, JusticeError::Pdf(_)));
    let response = AppError::from(error).into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn download_failure_answers_bad_gateway() {
    let gateway = Arc::new(FakeJustice::failing(ExternalApiError::new(
        "Justice document download failed",
        "justice",
    )));
    let service = build_service(gateway);

    let error = service
        .get_document("27082440", "doc-1")
        .await
        .expect_err("download fails");

    let response = AppError::from(error).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "Justice document download failed");
    assert_eq!(body["service"], "justice");
}

#[tokio::test]
async fn companies_are_parsed_from_the_dataset() {
    let gateway = Arc::new(FakeJustice::new());
    let service = build_service(gateway.clone());

    let records = service
        .import_companies(DATASET_URL)
        .await
        .expect("import");

    assert_eq!(gateway.csv_calls(), vec![DATASET_URL.to_string()]);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].ico, "27082440");
    assert_eq!(records[0].name, "Alza.cz a.s.");
    assert_eq!(records[1].address, "Brno");
    assert_eq!(records[1].registry_court, "");
}

#[tokio::test]
async fn repeated_import_is_served_from_cache() {
    let gateway = Arc::new(FakeJustice::new());
    let service = build_service(gateway.clone());

    let first = service.import_companies(DATASET_URL).await.expect("first");
    let second = service.import_companies(DATASET_URL).await.expect("second");

    assert_eq!(first, second);
    assert_eq!(gateway.csv_calls().len(), 1);

    let hash =
        CacheService::hash_params(&serde_json::json!({ "url": DATASET_URL })).expect("hash");
    let cached = service.cache().get::<Vec<CompanyRecord>>(&["csv", &hash]);
    assert_eq!(cached.map(|rows| rows.len()), Some(2));
}

#[tokio::test]
async fn dataset_url_must_target_the_open_data_host() {
    let gateway = Arc::new(FakeJustice::new());
    let service = build_service(gateway.clone());

    let error = service
        .import_companies("https://example.com/export.csv")
        .await
        .expect_err("foreign host");
    let JusticeError::Validation(errors) = error else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.field("dataset_url"),
        Some(&["URL must point to dataor.justice.cz.".to_string()][..])
    );

    let error = service
        .import_companies("not a url")
        .await
        .expect_err("malformed");
    let JusticeError::Validation(errors) = error else {
        panic!("expected validation error");
    };
    assert_eq!(
        errors.field("dataset_url"),
        Some(&["Enter a valid URL.".to_string()][..])
    );

    assert!(service
        .import_companies("ftp://dataor.justice.cz/export.csv")
        .await
        .is_err());
    assert!(gateway.csv_calls().is_empty());
}
