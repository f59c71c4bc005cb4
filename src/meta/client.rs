//! Backend interface shared by the primary, the secondary and the fallback
//! client.

use async_trait::async_trait;

use crate::config::{SecondaryConfig, TlsConfig};
use crate::meta::error::MetaResult;
use crate::meta::types::{Region, RegionOptions, Store, StoreOptions};

/// Operations exposed by a metadata backend.
///
/// Implementations must be safe to share across tasks. Every implementation
/// serving the same cluster is expected to return equivalent answers for the
/// same arguments.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Region covering `key`.
    async fn get_region(&self, key: &[u8], opts: RegionOptions) -> MetaResult<Option<Region>>;

    /// Region immediately preceding the one covering `key`.
    async fn get_prev_region(&self, key: &[u8], opts: RegionOptions)
        -> MetaResult<Option<Region>>;

    /// Region with the given id.
    async fn get_region_by_id(&self, region_id: u64, opts: RegionOptions)
        -> MetaResult<Option<Region>>;

    /// Up to `limit` regions overlapping `[key, end_key)`. An empty `end_key`
    /// scans to the end of the key space.
    async fn scan_regions(
        &self,
        key: &[u8],
        end_key: &[u8],
        limit: usize,
        opts: RegionOptions,
    ) -> MetaResult<Vec<Region>>;

    /// Store with the given id.
    async fn get_store(&self, store_id: u64) -> MetaResult<Option<Store>>;

    /// All stores passing `opts`.
    async fn get_all_stores(&self, opts: StoreOptions) -> MetaResult<Vec<Store>>;

    /// Release the client's resources. Must be safe to call more than once.
    fn close(&self);
}

/// Backends that can be built from connection parameters.
///
/// The fallback client uses this to construct and own its secondary backend.
#[async_trait]
pub trait Connect: MetadataClient + Sized + 'static {
    async fn connect(config: &SecondaryConfig, tls: Option<&TlsConfig>) -> MetaResult<Self>;
}
