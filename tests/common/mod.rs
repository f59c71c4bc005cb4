//! Shared utilities for integration tests: programmable in-memory backends.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use meta_failover::config::{SecondaryConfig, TlsConfig};
use meta_failover::meta::{
    Connect, MetaError, MetaResult, MetadataClient, Region, RegionMeta, RegionOptions, Store,
    StoreOptions, StoreState,
};

/// A recorded backend call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRegion(Vec<u8>, RegionOptions),
    GetPrevRegion(Vec<u8>, RegionOptions),
    GetRegionById(u64, RegionOptions),
    ScanRegions(Vec<u8>, Vec<u8>, usize, RegionOptions),
    GetStore(u64),
    GetAllStores(StoreOptions),
}

/// How the backend answers.
#[allow(dead_code)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Healthy = 0,
    Failing = 1,
    /// Wait `hang_for`, then report a timeout.
    Hanging = 2,
}

impl From<u8> for Mode {
    fn from(val: u8) -> Self {
        match val {
            1 => Mode::Failing,
            2 => Mode::Hanging,
            _ => Mode::Healthy,
        }
    }
}

fn region(id: u64, start: &[u8], end: &[u8]) -> Region {
    Region {
        meta: RegionMeta {
            id,
            start_key: start.to_vec(),
            end_key: end.to_vec(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// In-memory metadata backend over three regions and three stores.
///
/// Store versions carry the backend's tag so tests can tell who answered.
pub struct MockBackend {
    tag: String,
    regions: Vec<Region>,
    stores: Vec<Store>,
    mode: AtomicU8,
    hang_for: Duration,
    calls: Mutex<Vec<Call>>,
    closes: AtomicUsize,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new(tag: &str) -> Arc<Self> {
        Arc::new(Self::build(tag))
    }

    fn build(tag: &str) -> Self {
        let store = |id: u64, state: StoreState| Store {
            id,
            address: format!("store-{id}:20160"),
            state,
            labels: Vec::new(),
            version: tag.to_string(),
        };

        Self {
            tag: tag.to_string(),
            regions: vec![region(1, b"", b"b"), region(2, b"b", b"m"), region(3, b"m", b"")],
            stores: vec![
                store(1, StoreState::Up),
                store(2, StoreState::Up),
                store(3, StoreState::Tombstone),
            ],
            mode: AtomicU8::new(Mode::Healthy as u8),
            hang_for: Duration::from_secs(10),
            calls: Mutex::new(Vec::new()),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode as u8, Ordering::SeqCst);
    }

    pub fn mode(&self) -> Mode {
        Mode::from(self.mode.load(Ordering::SeqCst))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls other than recovery probes.
    pub fn request_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::GetRegionById(1, _)))
            .count()
    }

    /// Recovery probes received.
    pub fn probe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::GetRegionById(1, _)))
            .count()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    async fn answer(&self, call: Call) -> MetaResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.mode() {
            Mode::Healthy => Ok(()),
            Mode::Failing => Err(MetaError::Rpc(format!("{} unavailable", self.tag))),
            Mode::Hanging => {
                tokio::time::sleep(self.hang_for).await;
                Err(MetaError::Timeout(self.hang_for))
            }
        }
    }

    fn with_buckets(region: &Region, opts: RegionOptions) -> Region {
        let mut region = region.clone();
        if opts.need_buckets {
            region.buckets = Some(vec![region.meta.start_key.clone()]);
        }
        region
    }

    fn position(&self, key: &[u8]) -> Option<usize> {
        self.regions.iter().position(|r| r.meta.contains(key))
    }
}

#[async_trait]
impl MetadataClient for MockBackend {
    async fn get_region(&self, key: &[u8], opts: RegionOptions) -> MetaResult<Option<Region>> {
        self.answer(Call::GetRegion(key.to_vec(), opts)).await?;
        Ok(self
            .position(key)
            .map(|i| Self::with_buckets(&self.regions[i], opts)))
    }

    async fn get_prev_region(
        &self,
        key: &[u8],
        opts: RegionOptions,
    ) -> MetaResult<Option<Region>> {
        self.answer(Call::GetPrevRegion(key.to_vec(), opts)).await?;
        Ok(self
            .position(key)
            .and_then(|i| i.checked_sub(1))
            .map(|i| Self::with_buckets(&self.regions[i], opts)))
    }

    async fn get_region_by_id(
        &self,
        region_id: u64,
        opts: RegionOptions,
    ) -> MetaResult<Option<Region>> {
        self.answer(Call::GetRegionById(region_id, opts)).await?;
        Ok(self
            .regions
            .iter()
            .find(|r| r.id() == region_id)
            .map(|r| Self::with_buckets(r, opts)))
    }

    async fn scan_regions(
        &self,
        key: &[u8],
        end_key: &[u8],
        limit: usize,
        opts: RegionOptions,
    ) -> MetaResult<Vec<Region>> {
        self.answer(Call::ScanRegions(key.to_vec(), end_key.to_vec(), limit, opts))
            .await?;
        let limit = if limit == 0 { usize::MAX } else { limit };
        Ok(self
            .regions
            .iter()
            .filter(|r| r.meta.end_key.is_empty() || r.meta.end_key.as_slice() > key)
            .filter(|r| end_key.is_empty() || r.meta.start_key.as_slice() < end_key)
            .take(limit)
            .map(|r| Self::with_buckets(r, opts))
            .collect())
    }

    async fn get_store(&self, store_id: u64) -> MetaResult<Option<Store>> {
        self.answer(Call::GetStore(store_id)).await?;
        Ok(self.stores.iter().find(|s| s.id == store_id).cloned())
    }

    async fn get_all_stores(&self, opts: StoreOptions) -> MetaResult<Vec<Store>> {
        self.answer(Call::GetAllStores(opts)).await?;
        Ok(self
            .stores
            .iter()
            .filter(|s| opts.matches(s))
            .cloned()
            .collect())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connect for MockBackend {
    async fn connect(config: &SecondaryConfig, tls: Option<&TlsConfig>) -> MetaResult<Self> {
        if config.endpoints.iter().any(|e| e.contains("unreachable")) {
            return Err(MetaError::Connect(format!(
                "cannot reach {:?}",
                config.endpoints
            )));
        }
        let tag = if tls.is_some() { "secondary-tls" } else { "secondary" };
        Ok(Self::build(tag))
    }
}
