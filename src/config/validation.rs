//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, value ranges and filter directives
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("routing.outlet_marker must not be empty")]
    EmptyOutlet,

    #[error("observability.log_level: invalid filter `{0}`")]
    InvalidLogLevel(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("limits.max_body_bytes"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.routing.outlet_marker.is_empty() {
        errors.push(ValidationError::EmptyOutlet);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.routing.outlet_marker.clear();
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "bad".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: "nowhere".into()
                },
                ValidationError::Zero("timeouts.request_secs"),
                ValidationError::EmptyOutlet,
                ValidationError::InvalidAddress {
                    field: "observability.metrics_address",
                    value: "bad".into()
                },
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());
    }
}
