//! Metadata client failover library.
//!
//! Puts a circuit breaker in front of a primary metadata backend and
//! transparently serves callers from a secondary backend while the primary is
//! unhealthy. Recovery is detected by a background probe, never by a caller's
//! request.
//!
//! ```text
//! caller → FallbackClient ─┬─ CircuitBreaker → primary   (preferred)
//!                          └─ secondary                  (on rejection or error)
//! ```

pub mod config;
pub mod lifecycle;
pub mod meta;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::FailoverConfig;
pub use meta::{MetaError, MetaResult, MetadataClient};
pub use resilience::{BreakerOptions, CircuitBreaker};
pub use routing::FallbackClient;
