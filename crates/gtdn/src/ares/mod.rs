//! Czech business registry (ARES) integration.
//!
//! Requests flow `router -> service -> client`, and responses come back
//! through `parser`, which maps the registry's Czech wire schema onto the
//! English entity model in `types`.

pub mod client;
pub mod constants;
pub mod form;
pub mod format;
pub mod parser;
pub mod router;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::{normalize_ico, AresApiError, AresGateway, AresHttpClient, AresStatusKind};
pub use form::SearchForm;
pub use router::{ares_router, ares_router_with_throttles};
pub use service::{AresService, AresServiceError};
pub use types::{
    BusinessRecord, DeliveryAddress, EconomicSubject, Headquarters, RegistrationStatuses,
    SearchLocation, SearchParams, SearchResult,
};
