//! Metadata client with automatic failover to a secondary backend.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::SecondaryConfig;
use crate::meta::{
    Connect, MetaResult, MetadataClient, Region, RegionOptions, Store, StoreOptions,
};
use crate::resilience::{BreakerOptions, CircuitBreaker};
use crate::routing::probe::metadata_probe;

/// Resource name of the breaker guarding the primary.
pub const FALLBACK_CLIENT_NAME: &str = "metadata-fallback-client";

/// Metadata client that prefers the primary backend and falls back to a
/// secondary one.
///
/// The primary is shared with, and closed by, the caller. The secondary and the
/// breaker belong to this client and are released by [`MetadataClient::close`]
/// or on drop.
pub struct FallbackClient {
    primary: Arc<dyn MetadataClient>,
    secondary: Arc<dyn MetadataClient>,
    breaker: CircuitBreaker,
    closed: AtomicBool,
}

impl FallbackClient {
    /// Connect a secondary backend of type `S` and wrap `primary`.
    ///
    /// `options` defaults to [`BreakerOptions::default`].
    pub async fn connect<S: Connect>(
        primary: Arc<dyn MetadataClient>,
        config: &SecondaryConfig,
        options: Option<BreakerOptions>,
    ) -> MetaResult<Self> {
        let secondary = S::connect(config, config.tls.as_ref()).await?;
        tracing::info!(
            endpoints = ?config.endpoints,
            tls = config.tls.is_some(),
            "Secondary metadata client connected"
        );
        Ok(Self::with_secondary(primary, Arc::new(secondary), options))
    }

    /// Wrap `primary` with an already connected secondary. Ownership of the
    /// secondary passes to the returned client.
    pub fn with_secondary(
        primary: Arc<dyn MetadataClient>,
        secondary: Arc<dyn MetadataClient>,
        options: Option<BreakerOptions>,
    ) -> Self {
        let options = options.unwrap_or_default();
        let probe = metadata_probe(primary.clone(), options.probe_timeout);
        tracing::debug!(name = FALLBACK_CLIENT_NAME, ?options, "Fallback metadata client created");
        Self {
            primary,
            secondary,
            breaker: CircuitBreaker::new(FALLBACK_CLIENT_NAME, options, probe),
            closed: AtomicBool::new(false),
        }
    }

    /// Breaker guarding the primary.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Try `call` on the primary through the breaker, then on the secondary.
    async fn dispatch<'a, T, F>(&'a self, operation: &'static str, call: F) -> MetaResult<T>
    where
        F: Fn(&'a dyn MetadataClient) -> BoxFuture<'a, MetaResult<T>>,
    {
        let primary = self.primary.as_ref();
        match self.breaker.execute(|| call(primary)).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(operation, error = %e, "Primary metadata call failed, using secondary");
                call(self.secondary.as_ref()).await
            }
        }
    }
}

#[async_trait]
impl MetadataClient for FallbackClient {
    async fn get_region(&self, key: &[u8], opts: RegionOptions) -> MetaResult<Option<Region>> {
        self.dispatch("get_region", |c| c.get_region(key, opts)).await
    }

    async fn get_prev_region(
        &self,
        key: &[u8],
        opts: RegionOptions,
    ) -> MetaResult<Option<Region>> {
        self.dispatch("get_prev_region", |c| c.get_prev_region(key, opts))
            .await
    }

    async fn get_region_by_id(
        &self,
        region_id: u64,
        opts: RegionOptions,
    ) -> MetaResult<Option<Region>> {
        self.dispatch("get_region_by_id", |c| c.get_region_by_id(region_id, opts))
            .await
    }

    async fn scan_regions(
        &self,
        key: &[u8],
        end_key: &[u8],
        limit: usize,
        opts: RegionOptions,
    ) -> MetaResult<Vec<Region>> {
        self.dispatch("scan_regions", |c| c.scan_regions(key, end_key, limit, opts))
            .await
    }

    async fn get_store(&self, store_id: u64) -> MetaResult<Option<Store>> {
        self.dispatch("get_store", |c| c.get_store(store_id)).await
    }

    async fn get_all_stores(&self, opts: StoreOptions) -> MetaResult<Vec<Store>> {
        self.dispatch("get_all_stores", |c| c.get_all_stores(opts)).await
    }

    /// Close the secondary and the breaker. The primary is left open.
    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.secondary.close();
            tracing::info!(name = FALLBACK_CLIENT_NAME, "Fallback metadata client closed");
        }
        self.breaker.close();
    }
}

impl Drop for FallbackClient {
    fn drop(&mut self) {
        MetadataClient::close(self);
    }
}
