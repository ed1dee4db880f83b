//! Cloudflare Turnstile token verification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::TurnstileConfig;

pub const SITEVERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";
pub const VERIFICATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_TOKEN_LENGTH: usize = 2048;

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<(), CaptchaError>;
}

/// Why a token was not accepted. `Display` is the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptchaError {
    #[error("Server configuration error - missing Turnstile secret key.")]
    MissingSecret,
    #[error("Missing Turnstile verification.")]
    MissingToken,
    #[error("Invalid token format.")]
    MalformedToken,
    #[error("{}", rejection_message(.codes))]
    Rejected { codes: Vec<String> },
    #[error("Verification timeout. Please try again.")]
    Timeout,
    #[error("An error occurred during verification. Please try again.")]
    Unavailable,
}

/// User message for the first Cloudflare error code we recognise.
pub fn rejection_message(codes: &[String]) -> &'static str {
    codes
        .iter()
        .find_map(|code| match code.as_str() {
            "timeout-or-duplicate" => {
                Some("Verification expired or already used. Please try again.")
            }
            "invalid-input-response" => Some("Invalid verification. Please refresh and try again."),
            "invalid-input-secret" | "missing-input-secret" => {
                Some("Server configuration error. Please contact support.")
            }
            "missing-input-response" => Some("Missing verification. Please complete the challenge."),
            "bad-request" => Some("Invalid request. Please try again."),
            "internal-error" => {
                Some("Verification service temporarily unavailable. Please try again.")
            }
            _ => None,
        })
        .unwrap_or("Verification failed. Please try again.")
}

/// Checks that need no round trip.
pub fn check_locally(secret: &str, token: &str) -> Result<(), CaptchaError> {
    if secret.is_empty() {
        return Err(CaptchaError::MissingSecret);
    }
    if token.is_empty() {
        return Err(CaptchaError::MissingToken);
    }
    if token.chars().count() > MAX_TOKEN_LENGTH {
        return Err(CaptchaError::MalformedToken);
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
    #[serde(default)]
    hostname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TurnstileVerifier {
    http: Client,
    secret: String,
    endpoint: String,
}

impl TurnstileVerifier {
    pub fn new(config: &TurnstileConfig) -> Result<Self, CaptchaError> {
        let http = Client::builder()
            .timeout(VERIFICATION_TIMEOUT)
            .build()
            .map_err(|err| {
                tracing::error!(error = %err, "failed to build Turnstile HTTP client");
                CaptchaError::Unavailable
            })?;
        Ok(Self {
            http,
            secret: config.secret_key.clone(),
            endpoint: SITEVERIFY_URL.to_string(),
        })
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<(), CaptchaError> {
        check_locally(&self.secret, token)?;

        let mut form = vec![("secret", self.secret.as_str()), ("response", token)];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let failed = |err: reqwest::Error| {
            if err.is_timeout() {
                tracing::error!("Turnstile verification timed out");
                CaptchaError::Timeout
            } else {
                tracing::error!(error = %err, "Turnstile verification error");
                CaptchaError::Unavailable
            }
        };

        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(failed)?;
        let result: SiteverifyResponse = response.json().await.map_err(failed)?;

        if result.success {
            return Ok(());
        }
        tracing::warn!(
            codes = ?result.error_codes,
            hostname = result.hostname.as_deref().unwrap_or_default(),
            "Turnstile verification failed"
        );
        Err(CaptchaError::Rejected {
            codes: result.error_codes,
        })
    }
}
