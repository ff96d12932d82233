//! Observable in-memory catalog state.
//!
//! Both values live in `tokio::sync::watch` channels. Subscribers get the
//! latest value immediately and every replacement after that; dropping a
//! receiver unsubscribes.

use tokio::sync::watch;
use tracklist_core::{CatalogId, Playlist, TracklistResult};

/// The playlist collection and the current selection.
#[derive(Debug)]
pub struct CatalogState {
    playlists: watch::Sender<Vec<Playlist>>,
    current: watch::Sender<Option<CatalogId>>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogState {
    pub fn new() -> Self {
        let (playlists, _) = watch::channel(Vec::new());
        let (current, _) = watch::channel(None);
        Self { playlists, current }
    }

    /// Copy of the current collection.
    pub fn playlists(&self) -> Vec<Playlist> {
        self.playlists.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.borrow().is_empty()
    }

    pub fn find(&self, id: CatalogId) -> Option<Playlist> {
        self.playlists
            .borrow()
            .iter()
            .find(|p| p.playlist_id == Some(id))
            .cloned()
    }

    pub fn current_id(&self) -> Option<CatalogId> {
        *self.current.borrow()
    }

    /// The playlist matching the current selection, if both exist.
    pub fn current_playlist(&self) -> Option<Playlist> {
        self.current_id().and_then(|id| self.find(id))
    }

    pub fn subscribe_playlists(&self) -> watch::Receiver<Vec<Playlist>> {
        self.playlists.subscribe()
    }

    pub fn subscribe_current(&self) -> watch::Receiver<Option<CatalogId>> {
        self.current.subscribe()
    }

    /// Replace the collection and notify subscribers.
    pub fn publish_playlists(&self, playlists: Vec<Playlist>) {
        self.playlists.send_replace(playlists);
    }

    pub fn publish_current(&self, id: Option<CatalogId>) {
        self.current.send_replace(id);
    }

    /// Compute a replacement collection from the current one while holding
    /// the channel lock.
    ///
    /// `f` returns `Ok(None)` to leave the collection untouched. Subscribers
    /// are only notified when a replacement is installed. Returns whether
    /// that happened.
    pub fn modify_playlists<F>(&self, f: F) -> TracklistResult<bool>
    where
        F: FnOnce(&[Playlist]) -> TracklistResult<Option<Vec<Playlist>>>,
    {
        let mut outcome = Ok(false);
        self.playlists.send_if_modified(|current| match f(current) {
            Ok(Some(next)) => {
                *current = next;
                outcome = Ok(true);
                true
            }
            Ok(None) => false,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }

    /// Same as [`modify_playlists`](Self::modify_playlists) for the
    /// current selection.
    pub fn modify_current<F>(&self, f: F) -> TracklistResult<bool>
    where
        F: FnOnce(Option<CatalogId>) -> TracklistResult<Option<Option<CatalogId>>>,
    {
        let mut outcome = Ok(false);
        self.current.send_if_modified(|current| match f(*current) {
            Ok(Some(next)) => {
                *current = next;
                outcome = Ok(true);
                true
            }
            Ok(None) => false,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }
}
