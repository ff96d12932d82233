//! Tracklist Core - Catalog Types
//!
//! Playlist and song entities, the normalizer that builds them from
//! untrusted payloads, and the ordering engine that sorts them. All other
//! crates depend on this.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod format;
pub mod normalize;
pub mod ordering;

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use config::{CacheSecret, CatalogConfig};
pub use entities::{CatalogId, Playlist, Song};
pub use enums::{CriterionParseError, PlaylistSortCriterion, SongSortCriterion, Visibility};
pub use error::{
    AuthError, ConfigError, StorageError, TracklistError, TracklistResult, TransportError,
};
pub use format::format_duration;
pub use normalize::{
    is_valid_image_url, normalize_playlist, normalize_song, parse_timestamp, valid_cover_url,
    CoverKind, DefaultReason, EntityNormalizer, NormalizationDefault, Normalized,
    PLAYLIST_COVER_PLACEHOLDER, SONG_COVER_PLACEHOLDER,
};
pub use ordering::{
    compare, locale_cmp, sort_by, sort_playlists, sort_playlists_by_label, sort_songs,
    sort_songs_by_label, sorted, Orderable,
};
