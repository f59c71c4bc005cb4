//! Circuit breaker with asynchronous recovery probing.
//!
//! # States
//! - Closed: calls pass through and feed the rolling window
//! - Open: calls fail fast with [`BreakerError::Unavailable`]; a background
//!   task probes the resource
//!
//! # State Transitions
//! ```text
//! Closed → Open: trip predicate holds over the window (CAS, one winner)
//!     → winner spawns the single probe loop for this trip
//! Open → Closed: a probe succeeds (CAS), probe loop exits
//! ```
//!
//! # Design Decisions
//! - No half-open state: recovery is detected by the probe, never by
//!   letting a caller's request through
//! - The state flag and counters are atomics, so `execute` takes no lock
//! - Policy (trip predicate, probe function) is supplied by the owner
//! - Probes are never aborted mid-call; shutdown is observed between ticks

use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::BreakerConfig;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::resilience::timeouts::{with_timeout, Elapsed};
use crate::resilience::window::{Counts, RollingWindow};

/// Decides from the current window whether the breaker should open.
pub type TripPredicate = Arc<dyn Fn(&Counts) -> bool + Send + Sync>;

/// Health check invoked with the breaker's resource name while open.
pub type ProbeFn = Arc<dyn Fn(String) -> BoxFuture<'static, Result<(), ProbeError>> + Send + Sync>;

/// Build a predicate that trips once the window holds at least `min_requests`
/// requests and the failure ratio reaches `ratio`.
pub fn failure_ratio_at_least(min_requests: u32, ratio: f64) -> TripPredicate {
    Arc::new(move |counts: &Counts| {
        counts.requests >= min_requests && counts.failure_ratio() >= ratio
    })
}

/// At least 5 requests and at least 40% of them failed.
pub fn default_trip_predicate() -> TripPredicate {
    failure_ratio_at_least(5, 0.4)
}

/// Breaker state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed = 0,
    Open = 1,
}

impl From<u8> for BreakerState {
    fn from(val: u8) -> Self {
        match val {
            1 => BreakerState::Open,
            _ => BreakerState::Closed,
        }
    }
}

/// Errors returned by [`CircuitBreaker::execute`].
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The breaker is open; the operation was not attempted.
    #[error("resource unavailable: {name}")]
    Unavailable { name: String },

    /// The operation ran and failed.
    #[error("{0}")]
    Call(E),
}

impl<E> BreakerError<E> {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BreakerError::Unavailable { .. })
    }
}

/// A failed probe. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("probe failed: {0}")]
    Failed(String),

    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}

impl From<Elapsed> for ProbeError {
    fn from(e: Elapsed) -> Self {
        ProbeError::Timeout(e.0)
    }
}

/// Timing and trip policy of a breaker.
#[derive(Clone)]
pub struct BreakerOptions {
    /// Rolling window length. Zero never clears the window.
    pub interval: Duration,
    /// Idle time after a trip before the first probe.
    pub timeout: Duration,
    /// Time between probes.
    pub probe_interval: Duration,
    /// Bound on a single probe; a timed-out probe is a failed probe.
    pub probe_timeout: Duration,
    pub ready_to_trip: TripPredicate,
}

impl Default for BreakerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(1),
            probe_interval: Duration::from_secs(1),
            probe_timeout: Duration::from_secs(1),
            ready_to_trip: default_trip_predicate(),
        }
    }
}

impl From<&BreakerConfig> for BreakerOptions {
    fn from(config: &BreakerConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            timeout: Duration::from_millis(config.timeout_ms),
            probe_interval: Duration::from_millis(config.probe_interval_ms),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            ready_to_trip: failure_ratio_at_least(config.min_requests, config.failure_ratio),
        }
    }
}

impl fmt::Debug for BreakerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerOptions")
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("probe_interval", &self.probe_interval)
            .field("probe_timeout", &self.probe_timeout)
            .finish_non_exhaustive()
    }
}

/// Circuit breaker guarding a single resource.
///
/// Dropping the breaker closes it.
pub struct CircuitBreaker {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    options: BreakerOptions,
    probe: ProbeFn,
    state: AtomicU8,
    window: RollingWindow,
    shutdown: Shutdown,
    active_probes: AtomicUsize,
}

impl CircuitBreaker {
    /// Create a closed breaker for the resource called `name`.
    pub fn new(name: impl Into<String>, options: BreakerOptions, probe: ProbeFn) -> Self {
        let window = RollingWindow::new(options.interval);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                options,
                probe,
                state: AtomicU8::new(BreakerState::Closed as u8),
                window,
                shutdown: Shutdown::new(),
                active_probes: AtomicUsize::new(0),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> BreakerState {
        self.inner.state()
    }

    pub fn is_open(&self) -> bool {
        self.state() == BreakerState::Open
    }

    /// Counts in the current window.
    pub fn counts(&self) -> Counts {
        self.inner.window.snapshot()
    }

    /// Number of probe loops currently running. Never more than one.
    pub fn active_probe_loops(&self) -> usize {
        self.inner.active_probes.load(Ordering::Acquire)
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_triggered()
    }

    /// Run `op` unless the breaker is open.
    ///
    /// The outcome is recorded and may trip the breaker. Rejected calls are not
    /// recorded, nor are outcomes that arrive after their window has ended.
    pub async fn execute<T, E, F, Fut>(&self, op: F) -> Result<T, BreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.is_open() {
            return Err(BreakerError::Unavailable {
                name: self.inner.name.clone(),
            });
        }

        let generation = self.inner.window.on_request();
        match op().await {
            Ok(value) => {
                if let Some(counts) = self.inner.window.on_success(generation) {
                    self.inner.evaluate(&counts);
                }
                Ok(value)
            }
            Err(err) => {
                if let Some(counts) = self.inner.window.on_failure(generation) {
                    self.inner.evaluate(&counts);
                }
                Err(BreakerError::Call(err))
            }
        }
    }

    /// Stop the probe loop. Safe to call any number of times.
    pub fn close(&self) {
        if self.inner.shutdown.trigger() {
            tracing::debug!(name = %self.inner.name, "Circuit breaker closed");
        }
    }
}

impl Drop for CircuitBreaker {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .field("counts", &self.counts())
            .field("active_probe_loops", &self.active_probe_loops())
            .finish()
    }
}

impl Inner {
    fn state(&self) -> BreakerState {
        BreakerState::from(self.state.load(Ordering::Acquire))
    }

    fn evaluate(self: &Arc<Self>, counts: &Counts) {
        if self.state() == BreakerState::Closed && (self.options.ready_to_trip)(counts) {
            self.trip(counts);
        }
    }

    /// Closed → Open. Only the CAS winner spawns a probe loop.
    fn trip(self: &Arc<Self>, counts: &Counts) -> bool {
        if !self.transition(BreakerState::Closed, BreakerState::Open) {
            return false;
        }
        self.window.reset();

        tracing::warn!(
            name = %self.name,
            requests = counts.requests,
            failures = counts.total_failures,
            "Resource unavailable, opening circuit and starting probe"
        );

        let active = ActiveProbe::register(self.clone());
        let signal = self.shutdown.subscribe();
        tokio::spawn(self.clone().probe_loop(active, signal));
        true
    }

    /// Open → Closed.
    fn recover(&self) -> bool {
        if !self.transition(BreakerState::Open, BreakerState::Closed) {
            return false;
        }
        self.window.reset();
        true
    }

    fn transition(&self, from: BreakerState, to: BreakerState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    async fn probe_loop(self: Arc<Self>, active: ActiveProbe, mut shutdown: ShutdownSignal) {
        let period = self.options.probe_interval.max(Duration::from_millis(1));
        let mut ticker = time::interval_at(Instant::now() + self.options.timeout, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut attempts: u32 = 0;
        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::debug!(name = %self.name, attempts, "Probe loop received shutdown signal, exiting");
                    return;
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            match self.probe_once().await {
                Ok(()) => {
                    // gauge must drop before the state flips, a new trip may follow at once
                    drop(active);
                    if self.recover() {
                        tracing::info!(name = %self.name, attempts, "Resource recovered, closing circuit");
                    }
                    return;
                }
                Err(e) => {
                    tracing::warn!(name = %self.name, attempts, error = %e, "Resource still unavailable");
                }
            }
        }
    }

    async fn probe_once(&self) -> Result<(), ProbeError> {
        let probe = (self.probe)(self.name.clone());
        with_timeout(self.options.probe_timeout, probe).await?
    }
}

/// Keeps the active probe gauge accurate even if the task is dropped unpolled.
struct ActiveProbe {
    inner: Arc<Inner>,
}

impl ActiveProbe {
    fn register(inner: Arc<Inner>) -> Self {
        inner.active_probes.fetch_add(1, Ordering::AcqRel);
        Self { inner }
    }
}

impl Drop for ActiveProbe {
    fn drop(&mut self) {
        self.inner.active_probes.fetch_sub(1, Ordering::AcqRel);
    }
}
