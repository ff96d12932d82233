//! Tracklist Storage - Signed Cache and Backing Stores
//!
//! The signed cache persists values as HMAC-signed, timestamped envelopes
//! over a plain string key-value store, and refuses to return anything
//! that is expired or fails verification.

pub mod cache;
pub mod store;

pub use cache::{
    CacheEnvelope, CacheKey, CacheLookup, CacheRead, CacheStats, Clock, ManualClock, MissReason,
    SignedCache, SystemClock,
};
pub use store::{InMemoryStore, KeyValueStore, LmdbStore};
