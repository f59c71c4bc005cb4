//! Errors returned by metadata backends.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a metadata backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetaError {
    /// The remote call failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The remote call did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend could not be reached or constructed.
    #[error("connection error: {0}")]
    Connect(String),

    /// The client has been closed.
    #[error("client closed")]
    Closed,

    /// Construction parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;
