//! Request metadata extractors.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::{AppError, ValidationErrors};

/// Key for errors that belong to the body as a whole.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Best-effort client address used to key per-client throttles. Proxy
/// headers win over the socket peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let ip = header("cf-connecting-ip")
            .or(forwarded)
            .or_else(|| header("x-real-ip"))
            .map(str::to_string)
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| Self::UNKNOWN.to_string());

        Self(ip)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0);
        Ok(Self::resolve(&parts.headers, peer))
    }
}

/// JSON request body. Undecodable bodies answer 400 with field errors
/// keyed by the offending path.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "request body rejected");
                Err(AppError::Validation(rejection_errors(&rejection)))
            }
        }
    }
}

fn rejection_errors(rejection: &JsonRejection) -> ValidationErrors {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let detail = std::error::Error::source(err)
                .map(ToString::to_string)
                .unwrap_or_else(|| err.body_text());
            data_error(&detail)
        }
        other => ValidationErrors::single(NON_FIELD_ERRORS, other.body_text()),
    }
}

/// `path: message at line L column C` as produced by the JSON decoder.
/// A path never contains whitespace, which tells it apart from a bare
/// message such as `missing field ...`.
fn data_error(detail: &str) -> ValidationErrors {
    let detail = detail
        .rfind(" at line ")
        .map_or(detail, |position| &detail[..position]);
    match detail.split_once(": ") {
        Some((path, message)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            ValidationErrors::single(path, message)
        }
        _ => ValidationErrors::single(NON_FIELD_ERRORS, detail),
    }
}
