//! Configuration validation.
//!
//! Serde handles syntax; this checks values that parse but cannot work.
//! All errors are collected so a bad file is reported in one pass.

use thiserror::Error;
use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("base_url scheme '{0}' is not http or https")]
    UnsupportedScheme(String),

    #[error("retries.max_delay_ms ({max}) is smaller than retries.base_delay_ms ({base})")]
    DelayBounds { base: u64, max: u64 },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_level '{0}' is not a valid filter")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
        }
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    let retries = &config.retries;
    if retries.max_delay_ms < retries.base_delay_ms {
        errors.push(ValidationError::DelayBounds {
            base: retries.base_delay_ms,
            max: retries.max_delay_ms,
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    let level = &config.observability.log_level;
    if tracing_subscriber::EnvFilter::try_new(level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
