//! Region and store descriptors.

/// Region version information, bumped on membership or range changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegionEpoch {
    pub conf_ver: u64,
    pub version: u64,
}

/// Role of a replica inside a region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PeerRole {
    #[default]
    Voter,
    Learner,
}

/// A single replica of a region, hosted on a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Peer {
    pub id: u64,
    pub store_id: u64,
    pub role: PeerRole,
}

/// Static description of a region: its key range and replicas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMeta {
    pub id: u64,
    /// Inclusive start key. Empty means the beginning of the key space.
    pub start_key: Vec<u8>,
    /// Exclusive end key. Empty means the end of the key space.
    pub end_key: Vec<u8>,
    pub epoch: RegionEpoch,
    pub peers: Vec<Peer>,
}

impl RegionMeta {
    /// Return true if `key` falls inside `[start_key, end_key)`.
    pub fn contains(&self, key: &[u8]) -> bool {
        key >= self.start_key.as_slice()
            && (self.end_key.is_empty() || key < self.end_key.as_slice())
    }
}

/// A region as resolved by the metadata service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub meta: RegionMeta,
    pub leader: Option<Peer>,
    /// Bucket boundaries, present only when requested via [`RegionOptions`].
    pub buckets: Option<Vec<Vec<u8>>>,
}

impl Region {
    pub fn id(&self) -> u64 {
        self.meta.id
    }
}

/// Per-call options for region lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionOptions {
    /// Ask the backend to include bucket boundaries.
    pub need_buckets: bool,
}

/// Store lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StoreState {
    #[default]
    Up,
    Offline,
    Tombstone,
}

/// Free-form store label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StoreLabel {
    pub key: String,
    pub value: String,
}

/// A storage node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub id: u64,
    pub address: String,
    pub state: StoreState,
    pub labels: Vec<StoreLabel>,
    pub version: String,
}

/// Filter applied when listing stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Drop stores that have been permanently removed.
    pub exclude_tombstone: bool,
}

impl StoreOptions {
    /// Return true if `store` passes this filter.
    pub fn matches(&self, store: &Store) -> bool {
        !(self.exclude_tombstone && store.state == StoreState::Tombstone)
    }
}
