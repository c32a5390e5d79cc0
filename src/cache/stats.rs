//! Cache Statistics Module
//!
//! Tracks cache activity: hits, misses, insertions, refreshes, expirations
//! and explicit removals. The counters are atomics so any clone of the cache
//! handle can record against them without taking the entry lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Recorder ==
/// Live counters, shared by all handles of one cache.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    refreshes: AtomicU64,
    expirations: AtomicU64,
    removals: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a consistent-enough snapshot for reporting.
    pub(crate) fn snapshot(&self, live_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            live_entries,
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Successful reads of a live entry
    pub hits: u64,
    /// Reads that found no live entry
    pub misses: u64,
    /// Writes to a previously absent key
    pub insertions: u64,
    /// Writes that overwrote a live entry (timer reset)
    pub refreshes: u64,
    /// Entries removed by their expiry timer elapsing
    pub expirations: u64,
    /// Entries removed explicitly by the caller
    pub removals: u64,
    /// Entries currently present
    pub live_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_starts_at_zero() {
        let recorder = StatsRecorder::default();
        let stats = recorder.snapshot(0);

        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.insertions, 0);
        assert_eq!(stats.refreshes, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.removals, 0);
        assert_eq!(stats.live_entries, 0);
    }

    #[test]
    fn test_counters_accumulate() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        recorder.record_insertion();
        recorder.record_refresh();
        recorder.record_expiration();
        recorder.record_removal();

        let stats = recorder.snapshot(3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.removals, 1);
        assert_eq!(stats.live_entries, 3);
    }

    #[test]
    fn test_hit_rate_no_reads() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_miss();

        assert_eq!(recorder.snapshot(0).hit_rate(), 0.5);
    }

    #[test]
    fn test_stats_serialize() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();

        let json = serde_json::to_string(&recorder.snapshot(1)).unwrap();
        assert!(json.contains("\"hits\":1"));
        assert!(json.contains("\"live_entries\":1"));
    }
}
