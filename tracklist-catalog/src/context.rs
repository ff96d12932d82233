//! Explicitly constructed dependencies of the catalog.

use std::sync::Arc;

use tracklist_core::{CatalogConfig, ConfigError, TracklistResult};
use tracklist_storage::{
    CacheKey, Clock, InMemoryStore, KeyValueStore, LmdbStore, SignedCache, SystemClock,
};

use crate::auth::AuthProvider;
use crate::transport::CatalogTransport;

/// Cache type used by the catalog.
pub type CatalogCache = SignedCache<Arc<dyn KeyValueStore>, Arc<dyn Clock>>;

/// Everything the repository needs: validated config, the signed cache,
/// and the two remote collaborators.
pub struct CatalogContext {
    config: CatalogConfig,
    cache: CatalogCache,
    auth: Arc<dyn AuthProvider>,
    transport: Arc<dyn CatalogTransport>,
    playlists_key: CacheKey,
    current_key: CacheKey,
}

impl CatalogContext {
    /// Build a context over `store` using the system clock.
    ///
    /// # Errors
    ///
    /// Returns `TracklistError::Config` if the config does not validate.
    pub fn new(
        config: CatalogConfig,
        store: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn CatalogTransport>,
    ) -> TracklistResult<Self> {
        Self::with_clock(config, store, Arc::new(SystemClock), auth, transport)
    }

    pub fn with_clock(
        config: CatalogConfig,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn CatalogTransport>,
    ) -> TracklistResult<Self> {
        config.validate()?;
        let invalid_namespace = || ConfigError::InvalidValue {
            field: "cache_namespace".to_string(),
            value: config.cache_namespace.clone(),
            reason: "not a valid key namespace".to_string(),
        };
        let playlists_key =
            CacheKey::playlists(&config.cache_namespace).ok_or_else(invalid_namespace)?;
        let current_key =
            CacheKey::current_playlist_id(&config.cache_namespace).ok_or_else(invalid_namespace)?;

        Ok(Self {
            cache: SignedCache::with_clock(store, clock),
            config,
            auth,
            transport,
            playlists_key,
            current_key,
        })
    }

    /// Open the store the config asks for: LMDB when a path is set,
    /// otherwise an in-memory map.
    pub fn open_store(config: &CatalogConfig) -> TracklistResult<Arc<dyn KeyValueStore>> {
        match &config.lmdb_path {
            Some(path) => {
                let store = LmdbStore::open(path, config.lmdb_map_size_bytes())?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(InMemoryStore::new())),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    pub fn transport(&self) -> &dyn CatalogTransport {
        self.transport.as_ref()
    }

    pub fn playlists_key(&self) -> &CacheKey {
        &self.playlists_key
    }

    pub fn current_key(&self) -> &CacheKey {
        &self.current_key
    }
}

impl std::fmt::Debug for CatalogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogContext")
            .field("config", &self.config)
            .field("playlists_key", &self.playlists_key)
            .field("current_key", &self.current_key)
            .finish_non_exhaustive()
    }
}
