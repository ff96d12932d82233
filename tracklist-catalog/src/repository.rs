//! Catalog repository: the one place that combines cache, remote fetch,
//! normalization and observable state.
//!
//! Reads go in-memory → signed cache → remote. Every change to the
//! collection or the current selection is persisted to the cache before it
//! is published, so a failed write leaves the observable state unchanged.

use serde_json::Value;
use tokio::sync::watch;
use tracklist_core::{
    sorted, CatalogId, EntityNormalizer, Playlist, PlaylistSortCriterion, Song,
    SongSortCriterion, TracklistResult,
};
use tracklist_storage::{CacheLookup, CacheStats, Clock};

use crate::context::CatalogContext;
use crate::state::CatalogState;

/// What [`CatalogRepository::restore`] found in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreOutcome {
    pub playlists: usize,
    pub current_playlist_id: Option<CatalogId>,
}

/// Facade over the playlist catalog.
#[derive(Debug)]
pub struct CatalogRepository {
    ctx: CatalogContext,
    state: CatalogState,
}

impl CatalogRepository {
    pub fn new(ctx: CatalogContext) -> Self {
        Self {
            ctx,
            state: CatalogState::new(),
        }
    }

    pub fn context(&self) -> &CatalogContext {
        &self.ctx
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// All playlists.
    ///
    /// Served from memory when already loaded, then from the signed cache,
    /// and only fetched remotely when both are empty.
    pub async fn playlists(&self) -> TracklistResult<Vec<Playlist>> {
        if !self.state.is_empty() {
            return Ok(self.state.playlists());
        }

        if let Some(cached) = self.load_cached_playlists()? {
            if !cached.is_empty() {
                tracing::debug!(count = cached.len(), "playlists served from cache");
                self.state.publish_playlists(cached.clone());
                return Ok(cached);
            }
        }

        self.refresh().await
    }

    /// Refetch all playlists, bypassing memory and cache.
    pub async fn refresh(&self) -> TracklistResult<Vec<Playlist>> {
        let token = self.ctx.auth().token().await?;
        let raw = self.ctx.transport().fetch_playlists(&token).await?;
        let playlists = self.normalizer().playlists(&raw);

        self.persist_playlists(&playlists)?;
        self.state.publish_playlists(playlists.clone());
        tracing::info!(count = playlists.len(), "playlists fetched from remote");
        Ok(playlists)
    }

    /// One playlist by id, fetched and added to the collection if it is not
    /// loaded yet.
    pub async fn playlist(&self, id: CatalogId) -> TracklistResult<Playlist> {
        if let Some(found) = self.state.find(id) {
            return Ok(found);
        }

        let token = self.ctx.auth().token().await?;
        let raw = self.ctx.transport().fetch_playlist(&token, id).await?;
        let playlist = self.normalizer().playlist(&raw);
        tracing::info!(playlist_id = id, "playlist fetched from remote");

        self.add_playlist(playlist.clone())?;
        Ok(playlist)
    }

    pub fn current_playlist_id(&self) -> Option<CatalogId> {
        self.state.current_id()
    }

    /// The selected playlist, if it is loaded.
    pub fn current_playlist(&self) -> Option<Playlist> {
        self.state.current_playlist()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Append a playlist. A playlist whose id is already present is ignored
    /// and `Ok(false)` is returned.
    pub fn add_playlist(&self, playlist: Playlist) -> TracklistResult<bool> {
        let changed = self.state.modify_playlists(|current| {
            let duplicate = playlist.playlist_id.is_some()
                && current.iter().any(|p| p.playlist_id == playlist.playlist_id);
            if duplicate {
                return Ok(None);
            }
            let mut next = current.to_vec();
            next.push(playlist.clone());
            self.persist_playlists(&next)?;
            Ok(Some(next))
        })?;
        if !changed {
            tracing::debug!(playlist_id = ?playlist.playlist_id, "playlist already loaded");
        }
        Ok(changed)
    }

    /// Replace the playlist with the same id. Returns `Ok(false)` if no such
    /// playlist is loaded.
    pub fn update_playlist(&self, playlist: Playlist) -> TracklistResult<bool> {
        let Some(id) = playlist.playlist_id else {
            return Ok(false);
        };
        let changed = self.state.modify_playlists(|current| {
            let Some(index) = current.iter().position(|p| p.playlist_id == Some(id)) else {
                return Ok(None);
            };
            let mut next = current.to_vec();
            next[index] = playlist;
            self.persist_playlists(&next)?;
            Ok(Some(next))
        })?;
        if !changed {
            tracing::warn!(playlist_id = id, "update for a playlist that is not loaded");
        }
        Ok(changed)
    }

    /// Remove the playlist with `id`. Returns `Ok(false)` if it was not
    /// loaded.
    pub fn remove_playlist(&self, id: CatalogId) -> TracklistResult<bool> {
        let changed = self.state.modify_playlists(|current| {
            let next: Vec<Playlist> = current
                .iter()
                .filter(|p| p.playlist_id != Some(id))
                .cloned()
                .collect();
            if next.len() == current.len() {
                return Ok(None);
            }
            self.persist_playlists(&next)?;
            Ok(Some(next))
        })?;
        if !changed {
            tracing::warn!(playlist_id = id, "removal of a playlist that is not loaded");
        }
        Ok(changed)
    }

    /// Select a playlist. Setting the same id again does nothing; clearing
    /// the selection evicts the cached id.
    pub fn set_current_playlist(&self, id: Option<CatalogId>) -> TracklistResult<bool> {
        self.state.modify_current(|current| {
            if current == id {
                return Ok(None);
            }
            let cache = self.ctx.cache();
            match id {
                Some(id) => {
                    cache.put(self.ctx.current_key(), &id, &self.ctx.config().cache_secret)?
                }
                None => cache.evict(self.ctx.current_key())?,
            }
            tracing::debug!(playlist_id = ?id, "current playlist set");
            Ok(Some(id))
        })
    }

    /// Load the collection and the current selection from the cache.
    ///
    /// Cached playlists go through the normalizer again, so an entry written
    /// by an older build still yields valid entities.
    pub fn restore(&self) -> TracklistResult<RestoreOutcome> {
        let mut outcome = RestoreOutcome::default();

        if let Some(playlists) = self.load_cached_playlists()? {
            outcome.playlists = playlists.len();
            self.state.publish_playlists(playlists);
        }

        let config = self.ctx.config();
        let lookup = self.ctx.cache().get::<CatalogId>(
            self.ctx.current_key(),
            &config.cache_secret,
            config.cache_ttl_ms,
        )?;
        if let Some(id) = lookup.into_value() {
            outcome.current_playlist_id = Some(id);
            self.state.publish_current(Some(id));
        }

        tracing::info!(
            playlists = outcome.playlists,
            current_playlist_id = ?outcome.current_playlist_id,
            "catalog restored from cache"
        );
        Ok(outcome)
    }

    /// Drop all in-memory state and evict both cache entries.
    ///
    /// The in-memory state is always cleared and both evictions are always
    /// attempted; the first eviction failure is returned.
    pub fn clear(&self) -> TracklistResult<()> {
        self.state.publish_playlists(Vec::new());
        self.state.publish_current(None);

        let cache = self.ctx.cache();
        let playlists = cache.evict(self.ctx.playlists_key());
        let current = cache.evict(self.ctx.current_key());
        playlists.and(current)?;

        tracing::info!("catalog cleared");
        Ok(())
    }

    // ========================================================================
    // ORDERING
    // ========================================================================

    /// The loaded playlists in the requested order.
    pub fn sorted_playlists(
        &self,
        criterion: PlaylistSortCriterion,
        ascending: bool,
    ) -> Vec<Playlist> {
        sorted(&self.state.playlists(), Some(criterion), ascending)
    }

    /// Songs of a loaded playlist in the requested order.
    pub fn sorted_songs(
        &self,
        id: CatalogId,
        criterion: SongSortCriterion,
        ascending: bool,
    ) -> Option<Vec<Song>> {
        self.state
            .find(id)
            .map(|p| sorted(&p.songs, Some(criterion), ascending))
    }

    /// Songs of a loaded playlist in the playlist's own sort mode.
    pub fn songs_in_playlist_order(&self, id: CatalogId, ascending: bool) -> Option<Vec<Song>> {
        self.state
            .find(id)
            .map(|p| sorted(&p.songs, Some(p.sorting), ascending))
    }

    // ========================================================================
    // SUBSCRIPTIONS
    // ========================================================================

    pub fn subscribe_playlists(&self) -> watch::Receiver<Vec<Playlist>> {
        self.state.subscribe_playlists()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<CatalogId>> {
        self.state.subscribe_current()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.ctx.cache().stats()
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn normalizer(&self) -> EntityNormalizer {
        EntityNormalizer::at(self.ctx.cache().clock().now())
    }

    fn persist_playlists(&self, playlists: &[Playlist]) -> TracklistResult<()> {
        self.ctx
            .cache()
            .put(self.ctx.playlists_key(), &playlists, &self.ctx.config().cache_secret)
    }

    fn load_cached_playlists(&self) -> TracklistResult<Option<Vec<Playlist>>> {
        let config = self.ctx.config();
        let lookup = self.ctx.cache().get::<Value>(
            self.ctx.playlists_key(),
            &config.cache_secret,
            config.cache_ttl_ms,
        )?;
        match lookup {
            CacheLookup::Hit(read) => Ok(Some(self.normalizer().playlists(read.value()))),
            CacheLookup::Miss(reason) => {
                tracing::debug!(reason = %reason, "no usable cached playlists");
                Ok(None)
            }
        }
    }
}
