//! Remote catalog seam.
//!
//! Transports return the raw JSON they received. Turning it into entities
//! is the normalizer's job, so a transport never fails on a bad shape.

use async_trait::async_trait;
use serde_json::Value;
use tracklist_core::{CatalogId, TracklistResult};

use crate::auth::BearerToken;

/// Base path of the playlist endpoints.
pub const PLAYLISTS_ENDPOINT: &str = "/api/v1/playlists/";

/// Path of a single playlist.
pub fn playlist_endpoint(id: CatalogId) -> String {
    format!("{}{}", PLAYLISTS_ENDPOINT, id)
}

/// Read access to the remote playlist catalog.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Fetch every playlist visible to the token's owner.
    async fn fetch_playlists(&self, token: &BearerToken) -> TracklistResult<Value>;

    /// Fetch one playlist. Unknown ids report `TransportError::PlaylistNotFound`.
    async fn fetch_playlist(&self, token: &BearerToken, id: CatalogId) -> TracklistResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_endpoint() {
        assert_eq!(playlist_endpoint(12), "/api/v1/playlists/12");
    }
}
