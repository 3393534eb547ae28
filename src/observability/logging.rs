//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber
//! - Choose between pretty and JSON output
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Initialization fails loudly if a subscriber is already installed

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Build the level filter from `RUST_LOG`, falling back to the configured directive.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))
}

pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer()).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_directive() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ObservabilityConfig {
            log_level: "temploco=[".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(env_filter(&config).is_err());
    }

    #[test]
    fn test_accepts_module_directive() {
        let config = ObservabilityConfig {
            log_level: "temploco=debug,tower_http=info".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(env_filter(&config).is_ok());
    }
}
