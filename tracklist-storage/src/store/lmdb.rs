//! LMDB-backed store.
//!
//! Uses the heed crate (Rust bindings for LMDB) for a memory-mapped,
//! file-backed key-value store that survives restarts.
//!
//! # Thread Safety
//!
//! LMDB provides ACID transactions. The store uses:
//! - Read transactions for `read`
//! - Write transactions for `write` and `remove`

use std::path::Path;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use tracklist_core::{StorageError, TracklistResult};

use super::KeyValueStore;

/// File-backed store over a single unnamed LMDB database.
pub struct LmdbStore {
    env: Env,
    db: Database<Str, Str>,
}

impl std::fmt::Debug for LmdbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LmdbStore")
            .field("path", &self.env.path())
            .finish()
    }
}

impl LmdbStore {
    /// Open (or create) a store in `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `map_size_bytes` - Maximum size of the database
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the directory cannot be
    /// created or the environment cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, map_size_bytes: usize) -> TracklistResult<Self> {
        std::fs::create_dir_all(&path).map_err(|e| StorageError::Unavailable {
            reason: format!("cannot create {}: {}", path.as_ref().display(), e),
        })?;

        // SAFETY: callers must not open the same directory twice at once.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size_bytes)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| StorageError::Unavailable {
            reason: format!("failed to open LMDB environment: {}", e),
        })?;

        let mut wtxn = env.write_txn().map_err(|e| StorageError::Unavailable {
            reason: format!("transaction error: {}", e),
        })?;
        let db: Database<Str, Str> =
            env.create_database(&mut wtxn, None)
                .map_err(|e| StorageError::Unavailable {
                    reason: format!("failed to open database: {}", e),
                })?;
        wtxn.commit().map_err(|e| StorageError::Unavailable {
            reason: format!("transaction error: {}", e),
        })?;

        tracing::debug!(path = %path.as_ref().display(), "opened LMDB store");
        Ok(Self { env, db })
    }

    /// Number of stored keys.
    pub fn len(&self) -> TracklistResult<u64> {
        let rtxn = self.env.read_txn().map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        let count = self.db.len(&rtxn).map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        Ok(count)
    }

    pub fn is_empty(&self) -> TracklistResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for LmdbStore {
    fn read(&self, key: &str) -> TracklistResult<Option<String>> {
        let read_failed = |e: heed::Error| StorageError::ReadFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };
        let rtxn = self.env.read_txn().map_err(read_failed)?;
        let value = self.db.get(&rtxn, key).map_err(read_failed)?;
        Ok(value.map(str::to_string))
    }

    fn write(&self, key: &str, value: &str) -> TracklistResult<()> {
        let write_failed = |e: heed::Error| StorageError::WriteFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };
        let mut wtxn = self.env.write_txn().map_err(write_failed)?;
        self.db.put(&mut wtxn, key, value).map_err(write_failed)?;
        wtxn.commit().map_err(write_failed)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TracklistResult<()> {
        let remove_failed = |e: heed::Error| StorageError::RemoveFailed {
            key: key.to_string(),
            reason: e.to_string(),
        };
        let mut wtxn = self.env.write_txn().map_err(remove_failed)?;
        self.db.delete(&mut wtxn, key).map_err(remove_failed)?;
        wtxn.commit().map_err(remove_failed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, LmdbStore) {
        let dir = TempDir::new().unwrap();
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn test_write_read_remove() {
        let (_dir, store) = open_temp();
        assert!(store.is_empty().unwrap());

        store.write("tracklist:playlists", "{\"a\":1}").unwrap();
        assert_eq!(
            store.read("tracklist:playlists").unwrap(),
            Some("{\"a\":1}".to_string())
        );
        assert_eq!(store.len().unwrap(), 1);

        store.remove("tracklist:playlists").unwrap();
        assert_eq!(store.read("tracklist:playlists").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let (_dir, store) = open_temp();
        assert!(store.remove("tracklist:missing").is_ok());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
            store.write("tracklist:currentPlaylistId", "42").unwrap();
        }
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        assert_eq!(
            store.read("tracklist:currentPlaylistId").unwrap(),
            Some("42".to_string())
        );
    }
}
