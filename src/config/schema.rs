//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the failover layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FailoverConfig {
    /// Breaker window, trip policy and probing.
    pub breaker: BreakerConfig,

    /// Alternate backend the fallback client connects to and owns.
    pub secondary: SecondaryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Length of the rolling statistics window. Zero keeps counts forever.
    pub interval_ms: u64,

    /// Idle time after a trip before the first probe.
    pub timeout_ms: u64,

    /// Time between two probes while the breaker is open.
    pub probe_interval_ms: u64,

    /// Upper bound for a single probe invocation.
    pub probe_timeout_ms: u64,

    /// Minimum requests in the window before the breaker may trip.
    pub min_requests: u32,

    /// Failure ratio at or above which the breaker trips.
    pub failure_ratio: f64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            timeout_ms: 1_000,
            probe_interval_ms: 1_000,
            probe_timeout_ms: 1_000,
            min_requests: 5,
            failure_ratio: 0.4,
        }
    }
}

/// Secondary backend connection parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecondaryConfig {
    /// Endpoint URLs (e.g., "http://10.0.0.1:2379").
    pub endpoints: Vec<String>,

    /// Connection establishment timeout.
    pub connect_timeout_ms: u64,

    /// Optional TLS parameters, passed through to the backend.
    pub tls: Option<TlsConfig>,
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:2379".to_string()],
            connect_timeout_ms: 3_000,
            tls: None,
        }
    }
}

/// TLS configuration for backend connections.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to the CA bundle (PEM).
    pub ca_path: Option<String>,

    /// Path to the client certificate (PEM).
    pub cert_path: Option<String>,

    /// Path to the client private key (PEM).
    pub key_path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
