//! Request routing between the primary and secondary metadata backends.
//!
//! # Data Flow
//! ```text
//! Caller
//!     → fallback.rs: FallbackClient::<operation>
//!         → CircuitBreaker::execute(primary.<operation>)
//!             Ok  → returned as is
//!             Err → secondary.<operation> (same arguments), outcome is final
//!
//! While the breaker is open:
//!     probe.rs (region lookup on the primary, bounded by probe_timeout)
//! ```
//!
//! # Design Decisions
//! - One generic dispatch routine, every operation goes through it
//! - No retries, no caching, no merging of results
//! - The primary's error is dropped once the secondary is consulted; it is
//!   only logged at debug level

pub mod fallback;
pub mod probe;

pub use fallback::{FallbackClient, FALLBACK_CLIENT_NAME};
pub use probe::{metadata_probe, probe_metadata, PROBE_REGION_ID};
