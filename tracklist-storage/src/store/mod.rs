//! Backing stores for the signed cache.
//!
//! A store is a plain string-to-string map. It knows nothing about
//! envelopes, signatures or expiry; that all lives in [`crate::SignedCache`].

mod lmdb;
mod memory;

pub use lmdb::LmdbStore;
pub use memory::InMemoryStore;

use std::sync::Arc;

use tracklist_core::TracklistResult;

/// Synchronous key-value persistence.
///
/// Implementations report every failure as `TracklistError::Storage`.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> TracklistResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> TracklistResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> TracklistResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read(&self, key: &str) -> TracklistResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> TracklistResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> TracklistResult<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read(&self, key: &str) -> TracklistResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> TracklistResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> TracklistResult<()> {
        (**self).remove(key)
    }
}
