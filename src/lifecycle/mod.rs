//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     close() on a breaker or client
//!     → Shutdown::trigger (runs once)
//!     → every background task waiting on the signal exits at its next wake-up
//! ```
//!
//! # Design Decisions
//! - The signal is sticky: tasks that subscribe after the trigger still see it
//! - Triggering is idempotent and safe from many threads at once
//! - Shutdown is cooperative; tasks are never aborted

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
