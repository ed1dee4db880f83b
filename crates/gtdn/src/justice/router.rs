use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::client::JusticeGateway;
use super::csv_parser::CompanyRecord;
use super::service::JusticeService;
use super::types::{DatasetQuery, DocumentQuery, JusticeDocument};
use crate::error::AppError;

pub fn justice_router<G>(service: Arc<JusticeService<G>>) -> Router
where
    G: JusticeGateway + 'static,
{
    Router::new()
        .route("/api/v1/justice/documents/", get(document_handler::<G>))
        .route("/api/v1/justice/search/", get(search_handler::<G>))
        .with_state(service)
}

pub(crate) async fn document_handler<G>(
    State(service): State<Arc<JusticeService<G>>>,
    Query(query): Query<DocumentQuery>,
) -> Result<Json<JusticeDocument>, AppError>
where
    G: JusticeGateway + 'static,
{
    let (ico, document_id) = query.validate()?;
    let document = service.get_document(&ico, &document_id).await?;
    Ok(Json(document))
}

pub(crate) async fn search_handler<G>(
    State(service): State<Arc<JusticeService<G>>>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<Vec<CompanyRecord>>, AppError>
where
    G: JusticeGateway + 'static,
{
    let dataset_url = query.validate()?;
    let records = service.import_companies(&dataset_url).await?;
    Ok(Json(records))
}
