//! Signed cache layer.
//!
//! Values are wrapped in an HMAC-signed envelope with a write timestamp and
//! stored as JSON strings in a [`KeyValueStore`](crate::KeyValueStore).
//!
//! # Components
//!
//! - `CacheKey`: namespaced keys
//! - `CacheEnvelope`: the signed wire format
//! - `SignedCache`: put/get/evict with TTL and tamper checks
//! - `CacheLookup`: hit or miss-with-reason
//! - `CacheStats`: per-reason counters

mod envelope;
mod key;
mod lookup;
mod signed;
mod stats;

pub use envelope::{canonical_bytes, sign, verify_signature, CacheEnvelope};
pub use key::{CacheKey, CURRENT_PLAYLIST_ID, PLAYLISTS};
pub use lookup::{CacheLookup, CacheRead, MissReason};
pub use signed::{Clock, ManualClock, SignedCache, SystemClock};
pub use stats::CacheStats;
