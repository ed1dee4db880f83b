use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::client::AresGateway;
use super::constants::{districts_of, find_region, District, Region, REGION_CODES};
use super::service::AresService;
use super::types::{EconomicSubject, SearchParams, SearchResult};
use crate::error::AppError;
use crate::request::{ClientIp, JsonBody};
use crate::throttle::ClientThrottle;

/// Shared state behind the ARES routes.
pub struct AresRoutes<G> {
    pub service: Arc<AresService<G>>,
    pub search_throttle: ClientThrottle,
    pub detail_throttle: ClientThrottle,
}

/// Router builder with the default per-client rates.
pub fn ares_router<G>(service: Arc<AresService<G>>) -> Router
where
    G: AresGateway + 'static,
{
    ares_router_with_throttles(
        service,
        ClientThrottle::ares_search(),
        ClientThrottle::ares_detail(),
    )
}

pub fn ares_router_with_throttles<G>(
    service: Arc<AresService<G>>,
    search_throttle: ClientThrottle,
    detail_throttle: ClientThrottle,
) -> Router
where
    G: AresGateway + 'static,
{
    let state = Arc::new(AresRoutes {
        service,
        search_throttle,
        detail_throttle,
    });

    Router::new()
        .route("/api/v1/ares/search/", post(search_handler::<G>))
        .route("/api/v1/ares/subjects/:ico/", get(subject_handler::<G>))
        .route("/api/v1/ares/regions/", get(regions_handler))
        .route(
            "/api/v1/ares/regions/:code/districts/",
            get(districts_handler),
        )
        .with_state(state)
}

pub(crate) async fn search_handler<G>(
    State(routes): State<Arc<AresRoutes<G>>>,
    client: ClientIp,
    JsonBody(params): JsonBody<SearchParams>,
) -> Result<Json<SearchResult>, AppError>
where
    G: AresGateway + 'static,
{
    routes.search_throttle.check(client.as_str())?;
    let result = routes.service.search(&params).await?;
    Ok(Json(result))
}

pub(crate) async fn subject_handler<G>(
    State(routes): State<Arc<AresRoutes<G>>>,
    client: ClientIp,
    Path(ico): Path<String>,
) -> Result<Json<EconomicSubject>, AppError>
where
    G: AresGateway + 'static,
{
    routes.detail_throttle.check(client.as_str())?;
    let subject = routes.service.get_by_ico(&ico).await?;
    Ok(Json(subject))
}

pub(crate) async fn regions_handler() -> Json<&'static [Region]> {
    Json(&REGION_CODES)
}

#[derive(Debug, Serialize)]
pub(crate) struct RegionDistricts {
    region: Region,
    districts: Vec<District>,
}

pub(crate) async fn districts_handler(
    Path(code): Path<u32>,
) -> Result<Json<RegionDistricts>, AppError> {
    let region = find_region(code)
        .copied()
        .ok_or_else(|| AppError::NotFound(format!("Unknown region code {code}")))?;
    Ok(Json(RegionDistricts {
        region,
        districts: districts_of(code).copied().collect(),
    }))
}
