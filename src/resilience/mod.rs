//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a guarded resource:
//!     → circuit_breaker.rs (fail fast while open, otherwise run the call)
//!     → window.rs (record outcome in the rolling window)
//!     → circuit_breaker.rs (evaluate trip predicate, open + start probing)
//!
//! While open:
//!     probe loop → timeouts.rs (bounded probe) → close on first success
//! ```
//!
//! # Design Decisions
//! - No retries here: a rejected or failed call is reported to the caller,
//!   which decides where to go next
//! - Hot path is lock-free; only atomics are shared with the probe task
//! - One probe loop per trip, owned by the thread that won the trip

pub mod circuit_breaker;
pub mod timeouts;
pub mod window;

pub use circuit_breaker::{
    default_trip_predicate, failure_ratio_at_least, BreakerError, BreakerOptions, BreakerState,
    CircuitBreaker, ProbeError, ProbeFn, TripPredicate,
};
pub use window::Counts;
