use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log filter '{value}': unable to build EnvFilter")
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Resolve the filter: `RUST_LOG` wins, then the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            })
        }
    }
}

/// Install the global subscriber. Production output drops ANSI colours and
/// module targets so log shippers get one plain line per event.
pub fn init(config: &TelemetryConfig, environment: AppEnvironment) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let interactive = !environment.is_production();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(interactive)
        .with_ansi(interactive)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
