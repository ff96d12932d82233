//! Results of a cache read.
//!
//! A miss is a value, not an error: callers branch on it and fall back to
//! the remote source.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Why a read did not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// Nothing stored under the key.
    NotFound,
    /// The entry is older than the requested TTL. Evicted.
    Expired,
    /// The stored signature does not match the data. Evicted.
    TamperedSignature,
    /// The stored value is not an envelope, or its data does not decode
    /// into the requested type.
    MalformedPayload,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::NotFound => "not_found",
            MissReason::Expired => "expired",
            MissReason::TamperedSignature => "tampered_signature",
            MissReason::MalformedPayload => "malformed_payload",
        }
    }

    /// Whether a miss with this reason removes the entry.
    pub fn evicts(&self) -> bool {
        matches!(self, MissReason::Expired | MissReason::TamperedSignature)
    }
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified cached value with its write time.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRead<T> {
    value: T,
    cached_at: DateTime<Utc>,
}

impl<T> CacheRead<T> {
    pub fn new(value: T, cached_at: DateTime<Utc>) -> Self {
        Self { value, cached_at }
    }

    /// Consume the wrapper and return the underlying value.
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// When the value was written.
    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    /// Age of the value relative to `now`. Zero if written in the future.
    pub fn staleness_at(&self, now: DateTime<Utc>) -> Duration {
        (now - self.cached_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// Map the inner value to a new type.
    pub fn map<U, F>(self, f: F) -> CacheRead<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheRead {
            value: f(self.value),
            cached_at: self.cached_at,
        }
    }
}

impl<T> AsRef<T> for CacheRead<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Outcome of [`SignedCache::get`](crate::SignedCache::get).
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(CacheRead<T>),
    Miss(MissReason),
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            CacheLookup::Hit(_) => None,
            CacheLookup::Miss(reason) => Some(*reason),
        }
    }

    /// The value on a hit.
    pub fn into_value(self) -> Option<T> {
        match self {
            CacheLookup::Hit(read) => Some(read.into_value()),
            CacheLookup::Miss(_) => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> CacheLookup<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            CacheLookup::Hit(read) => CacheLookup::Hit(read.map(f)),
            CacheLookup::Miss(reason) => CacheLookup::Miss(reason),
        }
    }
}
