//! Rolling request statistics for the circuit breaker.
//!
//! Counters are plain atomics. A window is a generation of counts that is
//! cleared once `interval` has elapsed since it started; the first recorder to
//! notice the expiry wins a compare-and-swap on the deadline, bumps the
//! generation and clears the counters. An outcome is only recorded in the
//! generation its request was counted in; late outcomes are dropped. Readers
//! may observe a partially cleared window. The trip predicate is a heuristic,
//! so that is accepted.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Snapshot of the counters in the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub requests: u32,
    pub total_successes: u32,
    pub total_failures: u32,
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
}

impl Counts {
    /// Failures over requests, or zero for an empty window.
    pub fn failure_ratio(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        f64::from(self.total_failures) / f64::from(self.requests)
    }
}

/// Lock-free rolling window of request outcomes.
#[derive(Debug)]
pub struct RollingWindow {
    interval: Duration,
    origin: Instant,
    /// Window deadline in nanoseconds since `origin`. Unused when `interval` is zero.
    expiry: AtomicU64,
    generation: AtomicU64,
    requests: AtomicU32,
    total_successes: AtomicU32,
    total_failures: AtomicU32,
    consecutive_successes: AtomicU32,
    consecutive_failures: AtomicU32,
}

impl RollingWindow {
    /// Create a window that clears itself every `interval`. A zero interval
    /// never clears on its own.
    pub fn new(interval: Duration) -> Self {
        let window = Self {
            interval,
            origin: Instant::now(),
            expiry: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            requests: AtomicU32::new(0),
            total_successes: AtomicU32::new(0),
            total_failures: AtomicU32::new(0),
            consecutive_successes: AtomicU32::new(0),
            consecutive_failures: AtomicU32::new(0),
        };
        window.expiry.store(window.deadline_from(0), Ordering::Relaxed);
        window
    }

    /// Count a request that is about to run. Returns the generation its
    /// outcome must be recorded against.
    pub fn on_request(&self) -> u64 {
        self.roll();
        let generation = self.generation.load(Ordering::Acquire);
        self.requests.fetch_add(1, Ordering::Relaxed);
        generation
    }

    /// Record a success and return the resulting counts, or `None` if the
    /// request belongs to an earlier window.
    pub fn on_success(&self, generation: u64) -> Option<Counts> {
        if !self.is_current(generation) {
            return None;
        }
        self.total_successes.fetch_add(1, Ordering::Relaxed);
        self.consecutive_successes.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
        Some(self.snapshot())
    }

    /// Record a failure and return the resulting counts, or `None` if the
    /// request belongs to an earlier window.
    pub fn on_failure(&self, generation: u64) -> Option<Counts> {
        if !self.is_current(generation) {
            return None;
        }
        self.total_failures.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
        self.consecutive_successes.store(0, Ordering::Relaxed);
        Some(self.snapshot())
    }

    /// Generation of the current window.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Current counts.
    pub fn snapshot(&self) -> Counts {
        Counts {
            requests: self.requests.load(Ordering::Relaxed),
            total_successes: self.total_successes.load(Ordering::Relaxed),
            total_failures: self.total_failures.load(Ordering::Relaxed),
            consecutive_successes: self.consecutive_successes.load(Ordering::Relaxed),
            consecutive_failures: self.consecutive_failures.load(Ordering::Relaxed),
        }
    }

    /// Start a fresh window now.
    pub fn reset(&self) {
        self.expiry
            .store(self.deadline_from(self.elapsed_nanos()), Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.clear();
    }

    fn is_current(&self, generation: u64) -> bool {
        self.roll();
        self.generation.load(Ordering::Acquire) == generation
    }

    fn roll(&self) {
        if self.interval.is_zero() {
            return;
        }
        let now = self.elapsed_nanos();
        let expiry = self.expiry.load(Ordering::Relaxed);
        if now < expiry {
            return;
        }
        if self
            .expiry
            .compare_exchange(expiry, self.deadline_from(now), Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.generation.fetch_add(1, Ordering::AcqRel);
            self.clear();
        }
    }

    fn clear(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.total_successes.store(0, Ordering::Relaxed);
        self.total_failures.store(0, Ordering::Relaxed);
        self.consecutive_successes.store(0, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    fn deadline_from(&self, start: u64) -> u64 {
        let interval = u64::try_from(self.interval.as_nanos()).unwrap_or(u64::MAX);
        start.saturating_add(interval)
    }

    fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
