//! Metadata service model and client interface.
//!
//! # Data Flow
//! ```text
//! Caller
//!     → MetadataClient (client.rs): region / store lookups
//!     → concrete backend (primary or secondary, supplied by the caller)
//!     → types.rs values, or error.rs failures
//! ```
//!
//! # Design Decisions
//! - One trait for every backend so that the primary, the secondary and the
//!   fallback client are interchangeable
//! - A missing region or store is `Ok(None)`, not an error: only backend
//!   failures may trigger failover
//! - Cancellation is the caller's: every operation is a future that can be
//!   dropped or wrapped in `tokio::time::timeout`

pub mod client;
pub mod error;
pub mod types;

pub use client::{Connect, MetadataClient};
pub use error::{MetaError, MetaResult};
pub use types::{
    Peer, PeerRole, Region, RegionEpoch, RegionMeta, RegionOptions, Store, StoreLabel,
    StoreOptions, StoreState,
};
