//! Recovery probe for a metadata backend.

use futures_util::FutureExt;
use std::sync::Arc;
use std::time::Duration;

use crate::meta::{MetaError, MetaResult, MetadataClient, RegionOptions};
use crate::resilience::timeouts::with_timeout;
use crate::resilience::{ProbeError, ProbeFn};

/// Region looked up by the probe. Region 1 exists for the whole life of a cluster.
pub const PROBE_REGION_ID: u64 = 1;

/// Check that `client` answers a region lookup within `timeout`.
pub async fn probe_metadata(
    client: &dyn MetadataClient,
    name: &str,
    timeout: Duration,
) -> MetaResult<()> {
    let lookup = client.get_region_by_id(PROBE_REGION_ID, RegionOptions::default());
    let err = match with_timeout(timeout, lookup).await {
        Ok(Ok(_)) => {
            tracing::warn!(name, "Marking metadata client as available");
            return Ok(());
        }
        Ok(Err(e)) => e,
        Err(elapsed) => MetaError::Timeout(elapsed.0),
    };
    tracing::warn!(name, error = %err, "Metadata client still unavailable");
    Err(err)
}

/// Build a breaker probe that checks `client` with [`probe_metadata`].
pub fn metadata_probe(client: Arc<dyn MetadataClient>, timeout: Duration) -> ProbeFn {
    Arc::new(move |name: String| {
        let client = client.clone();
        async move {
            tracing::warn!(name = %name, "Origin metadata client unavailable, probing");
            probe_metadata(client.as_ref(), &name, timeout)
                .await
                .map_err(|e| ProbeError::Failed(e.to_string()))
        }
        .boxed()
    })
}
