//! Core entity structures
//!
//! Field names serialize in the camelCase form the remote API uses, so a
//! cached collection reads the same as the payload it was normalized from.

use crate::{SongSortCriterion, Timestamp, Visibility};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier for songs and playlists.
pub type CatalogId = i64;

/// A single track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_id: Option<CatalogId>,
    pub title: String,
    /// Ordered, never contains blank names
    pub artists: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub genres: Vec<String>,
    /// Duration in seconds
    pub playtime: u64,
    pub release_date: Timestamp,
    pub links_for_web_player: Vec<String>,
    pub cover_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_in_playlist: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_date: Option<Timestamp>,
}

impl Song {
    /// Artist names joined the way they are displayed and compared.
    pub fn joined_artists(&self) -> String {
        self.artists.join(", ")
    }
}

/// A named, ordered collection of songs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<CatalogId>,
    #[serde(rename = "playlistName")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub visibility: Visibility,
    /// Sort mode applied to this playlist's songs
    pub sorting: SongSortCriterion,
    pub songs: Vec<Song>,
    pub number_of_songs: u32,
    /// Total duration in seconds
    pub playtime: u64,
    pub date_added: Timestamp,
    pub cover_url: String,
}

impl Playlist {
    /// Sum of the playtimes of the songs currently held.
    pub fn song_playtime_total(&self) -> u64 {
        self.songs.iter().map(|s| s.playtime).sum()
    }

    /// Whether count and playtime agree with the song sequence.
    pub fn totals_consistent(&self) -> bool {
        self.number_of_songs as usize == self.songs.len()
            && self.playtime == self.song_playtime_total()
    }

    /// Return a copy whose count and playtime are derived from `songs`.
    ///
    /// The cache never does this on its own; callers that need the
    /// invariant opt in here.
    pub fn with_recomputed_totals(self) -> Self {
        let playtime = self.song_playtime_total();
        let number_of_songs = u32::try_from(self.songs.len()).unwrap_or(u32::MAX);
        Self {
            number_of_songs,
            playtime,
            ..self
        }
    }
}
