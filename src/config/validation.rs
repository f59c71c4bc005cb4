//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::FailoverConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("breaker.{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("breaker.min_requests must be at least 1")]
    ZeroMinRequests,

    #[error("breaker.failure_ratio must be in (0, 1], got {0}")]
    FailureRatio(f64),

    #[error("secondary.endpoints must not be empty")]
    NoEndpoints,

    #[error("secondary endpoint '{endpoint}' is invalid: {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("secondary.tls cert_path and key_path must be set together")]
    TlsKeyPair,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let breaker = &config.breaker;

    if breaker.probe_interval_ms == 0 {
        errors.push(ValidationError::ZeroDuration("probe_interval_ms"));
    }
    if breaker.probe_timeout_ms == 0 {
        errors.push(ValidationError::ZeroDuration("probe_timeout_ms"));
    }
    if breaker.min_requests == 0 {
        errors.push(ValidationError::ZeroMinRequests);
    }
    if !(breaker.failure_ratio > 0.0 && breaker.failure_ratio <= 1.0) {
        errors.push(ValidationError::FailureRatio(breaker.failure_ratio));
    }

    let secondary = &config.secondary;
    if secondary.endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }
    for endpoint in &secondary.endpoints {
        if let Err(reason) = check_endpoint(endpoint) {
            errors.push(ValidationError::Endpoint {
                endpoint: endpoint.clone(),
                reason,
            });
        }
    }
    if let Some(tls) = &secondary.tls {
        if tls.cert_path.is_some() != tls.key_path.is_some() {
            errors.push(ValidationError::TlsKeyPair);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(endpoint: &str) -> Result<(), String> {
    let url = Url::parse(endpoint).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{other}'")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
