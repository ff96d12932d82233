//! HMAC-signed, TTL-bounded cache over a [`KeyValueStore`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracklist_core::{CacheSecret, StorageError, Timestamp, TracklistResult};

use super::envelope::CacheEnvelope;
use super::key::CacheKey;
use super::lookup::{CacheLookup, CacheRead, MissReason};
use super::stats::{CacheStats, StatsRecorder};
use crate::store::KeyValueStore;

// ============================================================================
// CLOCK
// ============================================================================

/// Source of the current time for envelope timestamps and expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let millis = self.millis.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

// ============================================================================
// SIGNED CACHE
// ============================================================================

/// Stores values as signed envelopes and only returns them if the
/// signature verifies and the entry is within its TTL.
///
/// The secret is passed on every call and never retained.
#[derive(Debug)]
pub struct SignedCache<S, C = SystemClock> {
    store: S,
    clock: C,
    stats: StatsRecorder,
}

impl<S: KeyValueStore> SignedCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SignedCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            stats: StatsRecorder::default(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Sign `value` and write it under `key` with the current time.
    ///
    /// # Errors
    ///
    /// `StorageError::SerializationFailed` if the value cannot be turned
    /// into JSON, or whatever the backing store reports.
    pub fn put<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        secret: &CacheSecret,
    ) -> TracklistResult<()> {
        let raw_key = key.encode();
        let serialization_failed = |reason: String| StorageError::SerializationFailed {
            key: raw_key.clone(),
            reason,
        };

        let data = serde_json::to_value(value).map_err(|e| serialization_failed(e.to_string()))?;
        let timestamp = self.clock.now().timestamp_millis();
        let envelope =
            CacheEnvelope::seal(data, secret, timestamp).map_err(serialization_failed)?;
        let encoded = envelope
            .to_json()
            .map_err(|e| serialization_failed(e.to_string()))?;

        self.store.write(&raw_key, &encoded)?;
        self.stats.record_write();
        tracing::debug!(key = %raw_key, timestamp, "cache entry written");
        Ok(())
    }

    /// Read and verify the entry under `key`.
    ///
    /// Expiry is checked before the signature. Expired and tampered entries
    /// are removed from the store; a `ttl_ms` of zero or less always reads
    /// as expired.
    ///
    /// # Errors
    ///
    /// Only backing store failures, including a failed eviction.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &CacheKey,
        secret: &CacheSecret,
        ttl_ms: i64,
    ) -> TracklistResult<CacheLookup<T>> {
        let raw_key = key.encode();

        let Some(raw) = self.store.read(&raw_key)? else {
            return Ok(self.miss(&raw_key, MissReason::NotFound));
        };

        let envelope = match CacheEnvelope::parse(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(key = %raw_key, error = %e, "cache entry is not an envelope");
                return Ok(self.miss(&raw_key, MissReason::MalformedPayload));
            }
        };

        let now_ms = self.clock.now().timestamp_millis();
        if ttl_ms <= 0 || envelope.age_ms(now_ms) > ttl_ms {
            self.remove_entry(&raw_key)?;
            return Ok(self.miss(&raw_key, MissReason::Expired));
        }

        if !envelope.verify(secret) {
            tracing::warn!(key = %raw_key, "cache signature mismatch, evicting entry");
            self.remove_entry(&raw_key)?;
            return Ok(self.miss(&raw_key, MissReason::TamperedSignature));
        }

        let Some(cached_at) = DateTime::from_timestamp_millis(envelope.timestamp) else {
            return Ok(self.miss(&raw_key, MissReason::MalformedPayload));
        };

        match serde_json::from_value::<T>(envelope.data) {
            Ok(value) => {
                self.stats.record_hit();
                tracing::debug!(key = %raw_key, "cache hit");
                Ok(CacheLookup::Hit(CacheRead::new(value, cached_at)))
            }
            Err(e) => {
                tracing::debug!(key = %raw_key, error = %e, "cached data does not match requested type");
                Ok(self.miss(&raw_key, MissReason::MalformedPayload))
            }
        }
    }

    /// Remove the entry under `key`.
    pub fn evict(&self, key: &CacheKey) -> TracklistResult<()> {
        self.remove_entry(&key.encode())
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn remove_entry(&self, raw_key: &str) -> TracklistResult<()> {
        self.store.remove(raw_key)?;
        self.stats.record_eviction();
        tracing::debug!(key = %raw_key, "cache entry evicted");
        Ok(())
    }

    fn miss<T>(&self, raw_key: &str, reason: MissReason) -> CacheLookup<T> {
        self.stats.record_miss(reason);
        tracing::debug!(key = %raw_key, reason = %reason, "cache miss");
        CacheLookup::Miss(reason)
    }
}
