//! Cache statistics tracking and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Snapshot of object cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Suspending reads issued (object and property)
    pub reads: u64,
    /// Reads answered from a resolved record
    pub hits: u64,
    /// Reads that joined an in-flight fetch instead of starting one
    pub coalesced: u64,
    /// Protocol commands issued
    pub fetches_started: u64,
    /// Protocol commands that failed
    pub fetch_failures: u64,
    /// Descriptors that changed the cache during precache
    pub objects_precached: u64,
}

impl CacheStats {
    /// Fraction of reads served without waiting (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.reads == 0 {
            0.0
        } else {
            self.hits as f64 / self.reads as f64
        }
    }

    /// Fraction of reads that piggybacked on another fetch (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.reads == 0 {
            0.0
        } else {
            self.coalesced as f64 / self.reads as f64
        }
    }
}

/// Lock-free counters behind [`CacheStats`].
#[derive(Debug)]
pub(crate) struct StatsCounters {
    reads: AtomicU64,
    hits: AtomicU64,
    coalesced: AtomicU64,
    fetches_started: AtomicU64,
    fetch_failures: AtomicU64,
    objects_precached: AtomicU64,
    created_at: Instant,
}

impl Default for StatsCounters {
    fn default() -> Self {
        Self {
            reads: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
            fetches_started: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            objects_precached: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }
}

impl StatsCounters {
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch(&self) {
        self.fetches_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_precached(&self, count: usize) {
        self.objects_precached
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn uptime(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            reads: self.reads.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            fetches_started: self.fetches_started.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            objects_precached: self.objects_precached.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn log(&self, pauses: usize) {
        let stats = self.snapshot();
        info!(
            reads = stats.reads,
            hits = stats.hits,
            coalesced = stats.coalesced,
            fetches = stats.fetches_started,
            failures = stats.fetch_failures,
            precached = stats.objects_precached,
            pauses,
            uptime_secs = self.uptime().as_secs(),
            hit_rate = format!("{:.1}%", stats.hit_rate() * 100.0),
            "Object cache statistics"
        );
    }
}
