//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! resilience / routing / config
//!     → tracing events with structured fields (breaker name, operation, error)
//!     → logging.rs subscriber (stdout), filtered by RUST_LOG or config
//! ```
//!
//! # Design Decisions
//! - Library code only emits events; installing a subscriber is the
//!   embedding process's choice
//! - Trips and probe failures are `warn`, recoveries `info`, individual
//!   fallbacks `debug`

pub mod logging;
