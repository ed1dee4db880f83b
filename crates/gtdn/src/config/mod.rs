use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::ares::constants::{
    ARES_BASE_URL, ARES_DETAIL_CACHE_TTL, ARES_OUTBOUND_MAX_REQUESTS, ARES_OUTBOUND_WINDOW,
    ARES_REQUEST_TIMEOUT, ARES_SEARCH_CACHE_TTL,
};
use crate::justice::constants::{JUSTICE_BASE_URL, JUSTICE_OPENDATA_URL, REQUEST_TIMEOUT};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ares: AresConfig,
    pub justice: JusticeConfig,
    pub mail: MailConfig,
    pub turnstile: TurnstileConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&var_or("APP_ENV", "development"));

        let host = var_or("APP_HOST", "127.0.0.1");
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let allowed_origins = split_list(&var_or("CORS_ALLOWED_ORIGINS", "http://localhost:3000"));

        let log_level = var_or("APP_LOG_LEVEL", "info");

        let ares = AresConfig {
            base_url: var_or("ARES_BASE_URL", ARES_BASE_URL),
            timeout: Duration::from_secs(parse_var("ARES_TIMEOUT_SECS", ARES_REQUEST_TIMEOUT)?),
            search_cache_ttl: Duration::from_secs(parse_var(
                "ARES_SEARCH_CACHE_TTL",
                ARES_SEARCH_CACHE_TTL,
            )?),
            detail_cache_ttl: Duration::from_secs(parse_var(
                "ARES_DETAIL_CACHE_TTL",
                ARES_DETAIL_CACHE_TTL,
            )?),
            outbound_max_requests: parse_var(
                "ARES_OUTBOUND_MAX_REQUESTS",
                ARES_OUTBOUND_MAX_REQUESTS,
            )?,
            outbound_window: Duration::from_secs(parse_var(
                "ARES_OUTBOUND_WINDOW_SECS",
                ARES_OUTBOUND_WINDOW,
            )?),
        };

        let justice = JusticeConfig {
            base_url: var_or("JUSTICE_BASE_URL", JUSTICE_BASE_URL),
            opendata_url: var_or("JUSTICE_OPENDATA_URL", JUSTICE_OPENDATA_URL),
            timeout: Duration::from_secs(parse_var("JUSTICE_TIMEOUT_SECS", REQUEST_TIMEOUT)?),
        };

        let mail = MailConfig {
            host: var_or("MAIL_HOST", "127.0.0.1"),
            port: parse_var("MAIL_PORT", 587)?,
            username: var_or("MAIL_USERNAME", ""),
            password: var_or("MAIL_PASSWORD", ""),
            from_name: var_or("MAIL_FROM_NAME", "GTDN"),
            from_address: var_or("MAIL_FROM_ADDRESS", ""),
            recipient: var_or("FORM_RECIPIENT_EMAIL", ""),
        };

        let turnstile = TurnstileConfig {
            secret_key: var_or("TURNSTILE_SECRET_KEY", ""),
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                allowed_origins,
            },
            telemetry: TelemetryConfig { log_level },
            ares,
            justice,
            mail,
            turnstile,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        _ => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream ARES endpoint, caching and outbound budget.
#[derive(Debug, Clone)]
pub struct AresConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub search_cache_ttl: Duration,
    pub detail_cache_ttl: Duration,
    pub outbound_max_requests: u32,
    pub outbound_window: Duration,
}

impl Default for AresConfig {
    fn default() -> Self {
        Self {
            base_url: ARES_BASE_URL.to_string(),
            timeout: Duration::from_secs(ARES_REQUEST_TIMEOUT),
            search_cache_ttl: Duration::from_secs(ARES_SEARCH_CACHE_TTL),
            detail_cache_ttl: Duration::from_secs(ARES_DETAIL_CACHE_TTL),
            outbound_max_requests: ARES_OUTBOUND_MAX_REQUESTS,
            outbound_window: Duration::from_secs(ARES_OUTBOUND_WINDOW),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JusticeConfig {
    pub base_url: String,
    pub opendata_url: String,
    pub timeout: Duration,
}

impl Default for JusticeConfig {
    fn default() -> Self {
        Self {
            base_url: JUSTICE_BASE_URL.to_string(),
            opendata_url: JUSTICE_OPENDATA_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT),
        }
    }
}

/// SMTP relay used for form notifications.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub from_address: String,
    pub recipient: String,
}

impl MailConfig {
    /// `Name <address>` sender, matching what the relay expects in `From`.
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TurnstileConfig {
    pub secret_key: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
