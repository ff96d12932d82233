//! Cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

use super::lookup::MissReason;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of verified reads.
    pub hits: u64,
    pub misses_not_found: u64,
    pub misses_expired: u64,
    pub misses_tampered: u64,
    pub misses_malformed: u64,
    /// Number of successful writes.
    pub writes: u64,
    /// Entries removed on expiry, tamper detection or explicit eviction.
    pub evictions: u64,
}

impl CacheStats {
    /// Total misses across all reasons.
    pub fn misses(&self) -> u64 {
        self.misses_not_found + self.misses_expired + self.misses_tampered + self.misses_malformed
    }

    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lock-free counters behind [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses_not_found: AtomicU64,
    misses_expired: AtomicU64,
    misses_tampered: AtomicU64,
    misses_malformed: AtomicU64,
    writes: AtomicU64,
    evictions: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self, reason: MissReason) {
        let counter = match reason {
            MissReason::NotFound => &self.misses_not_found,
            MissReason::Expired => &self.misses_expired,
            MissReason::TamperedSignature => &self.misses_tampered,
            MissReason::MalformedPayload => &self.misses_malformed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses_not_found: self.misses_not_found.load(Ordering::Relaxed),
            misses_expired: self.misses_expired.load(Ordering::Relaxed),
            misses_tampered: self.misses_tampered.load(Ordering::Relaxed),
            misses_malformed: self.misses_malformed.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses_not_found: 15,
            misses_expired: 5,
            ..Default::default()
        };
        assert_eq!(stats.misses(), 20);
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);

        let empty_stats = CacheStats::default();
        assert!((empty_stats.hit_rate() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_recorder_snapshot() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_miss(MissReason::TamperedSignature);
        recorder.record_miss(MissReason::MalformedPayload);
        recorder.record_write();
        recorder.record_eviction();

        let stats = recorder.snapshot();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses_tampered, 1);
        assert_eq!(stats.misses_malformed, 1);
        assert_eq!(stats.misses(), 2);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.evictions, 1);
    }
}
