use std::sync::Arc;
use std::time::Duration;

use super::client::{normalize_ico, AresApiError, AresGateway};
use super::constants::ARES_MAX_PAGE_SIZE;
use super::parser::{to_economic_subject, to_search_result, to_search_request};
use super::types::{EconomicSubject, SearchParams, SearchResult};
use crate::cache::{CacheError, CacheService, CacheStore};
use crate::config::AresConfig;
use crate::error::ValidationErrors;
use crate::throttle::OutboundThrottle;

/// Error enumeration for the ARES service layer.
#[derive(Debug, thiserror::Error)]
pub enum AresServiceError {
    #[error("invalid search parameters: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Upstream(#[from] AresApiError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Cached, throttled front for an [`AresGateway`].
pub struct AresService<G> {
    gateway: Arc<G>,
    cache: CacheService,
    outbound: OutboundThrottle,
    search_ttl: Duration,
    detail_ttl: Duration,
}

impl<G> AresService<G>
where
    G: AresGateway,
{
    pub fn new(gateway: Arc<G>, store: Arc<dyn CacheStore>, config: &AresConfig) -> Self {
        Self {
            gateway,
            cache: CacheService::new("ares", config.search_cache_ttl, store),
            outbound: OutboundThrottle::new(
                "ares",
                config.outbound_max_requests,
                config.outbound_window,
            ),
            search_ttl: config.search_cache_ttl,
            detail_ttl: config.detail_cache_ttl,
        }
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult, AresServiceError> {
        validate_search_params(params)?;

        let request = to_search_request(params);
        let hash = CacheService::hash_params(&request)?;
        if let Some(cached) = self.cache.get::<SearchResult>(&["search", &hash]) {
            return Ok(cached);
        }

        self.reserve_outbound()?;
        let raw = self.gateway.search(&request).await?;
        let result = to_search_result(raw);

        self.cache
            .set(&result, &["search", &hash], Some(self.search_ttl))?;
        for subject in &result.economic_subjects {
            if !subject.ico_id.is_empty() {
                self.cache
                    .set(subject, &["detail", &subject.ico_id], Some(self.detail_ttl))?;
            }
        }

        tracing::info!(
            total = result.total_count,
            returned = result.economic_subjects.len(),
            "ARES search completed"
        );
        Ok(result)
    }

    pub async fn get_by_ico(&self, ico: &str) -> Result<EconomicSubject, AresServiceError> {
        let ico = normalize_ico(ico)?;

        if let Some(cached) = self.cache.get::<EconomicSubject>(&["detail", &ico]) {
            return Ok(cached);
        }

        self.reserve_outbound()?;
        let raw = self.gateway.get_by_ico(&ico).await?;
        let subject = to_economic_subject(raw);

        self.cache
            .set(&subject, &["detail", &ico], Some(self.detail_ttl))?;
        Ok(subject)
    }

    fn reserve_outbound(&self) -> Result<(), AresApiError> {
        if self.outbound.allow() {
            return Ok(());
        }
        tracing::warn!(
            key = self.outbound.key(),
            wait = ?self.outbound.wait_time(),
            "outbound ARES budget exhausted"
        );
        Err(AresApiError::OutboundLimit)
    }
}

/// Range checks on paging. Field names follow the JSON body.
pub fn validate_search_params(params: &SearchParams) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(start) = params.start {
        if start < 0 {
            errors.add("start", "Ensure this value is greater than or equal to 0.");
        }
    }
    if let Some(count) = params.count {
        if count < 1 {
            errors.add("count", "Ensure this value is greater than or equal to 1.");
        } else if count > ARES_MAX_PAGE_SIZE {
            errors.add(
                "count",
                format!("Ensure this value is less than or equal to {ARES_MAX_PAGE_SIZE}."),
            );
        }
    }
    errors.finish()
}
