//! Deadline enforcement for calls made by the resilience layer.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// The wrapped future did not complete before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} exceeded")]
pub struct Elapsed(pub Duration);

/// Run `fut` to completion or fail with [`Elapsed`] after `limit`.
pub async fn with_timeout<F: Future>(limit: Duration, fut: F) -> Result<F::Output, Elapsed> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Elapsed(limit))
}
