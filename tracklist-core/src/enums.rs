//! Enum types for catalog entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// VISIBILITY
// ============================================================================

/// Who can see a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    /// Visible to all users
    Public,
    /// Only visible to the owner
    #[default]
    Private,
}

impl Visibility {
    /// Wire representation used by the remote API.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }

    /// Lenient parse used for untrusted payloads.
    pub fn from_lenient(s: &str) -> Option<Self> {
        match normalize_token(s).as_str() {
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for Visibility {
    type Err = CriterionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            _ => Err(CriterionParseError(s.to_string())),
        }
    }
}

// ============================================================================
// SORT CRITERIA
// ============================================================================

/// Primary sort key for a collection of playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaylistSortCriterion {
    #[serde(rename = "Alphabetical")]
    Alphabetical,
    #[serde(rename = "Recently Added")]
    RecentlyAdded,
    #[serde(rename = "Number of Songs")]
    NumberOfSongs,
    #[serde(rename = "Total Playtime")]
    TotalPlaytime,
}

impl PlaylistSortCriterion {
    pub const ALL: [PlaylistSortCriterion; 4] = [
        PlaylistSortCriterion::Alphabetical,
        PlaylistSortCriterion::RecentlyAdded,
        PlaylistSortCriterion::NumberOfSongs,
        PlaylistSortCriterion::TotalPlaytime,
    ];

    /// The fixed, case-sensitive display label.
    pub fn as_label(&self) -> &'static str {
        match self {
            PlaylistSortCriterion::Alphabetical => "Alphabetical",
            PlaylistSortCriterion::RecentlyAdded => "Recently Added",
            PlaylistSortCriterion::NumberOfSongs => "Number of Songs",
            PlaylistSortCriterion::TotalPlaytime => "Total Playtime",
        }
    }
}

impl fmt::Display for PlaylistSortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for PlaylistSortCriterion {
    type Err = CriterionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_label() == s)
            .ok_or_else(|| CriterionParseError(s.to_string()))
    }
}

/// Primary sort key for the songs of a playlist.
///
/// A playlist stores one of these as its sort mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SongSortCriterion {
    /// User-defined order (position in playlist)
    #[default]
    #[serde(rename = "Custom")]
    Custom,
    #[serde(rename = "Title")]
    Title,
    #[serde(rename = "Artist")]
    Artist,
    #[serde(rename = "Recently Added")]
    RecentlyAdded,
    #[serde(rename = "Release Date")]
    ReleaseDate,
    #[serde(rename = "Playtime")]
    Playtime,
    #[serde(rename = "Album")]
    Album,
}

impl SongSortCriterion {
    pub const ALL: [SongSortCriterion; 7] = [
        SongSortCriterion::Custom,
        SongSortCriterion::Title,
        SongSortCriterion::Artist,
        SongSortCriterion::RecentlyAdded,
        SongSortCriterion::ReleaseDate,
        SongSortCriterion::Playtime,
        SongSortCriterion::Album,
    ];

    /// The fixed, case-sensitive display label.
    pub fn as_label(&self) -> &'static str {
        match self {
            SongSortCriterion::Custom => "Custom",
            SongSortCriterion::Title => "Title",
            SongSortCriterion::Artist => "Artist",
            SongSortCriterion::RecentlyAdded => "Recently Added",
            SongSortCriterion::ReleaseDate => "Release Date",
            SongSortCriterion::Playtime => "Playtime",
            SongSortCriterion::Album => "Album",
        }
    }

    /// Lenient parse used for untrusted payloads.
    ///
    /// Accepts the display label in any case as well as the backend
    /// constant form (`RELEASE_DATE`).
    pub fn from_lenient(s: &str) -> Option<Self> {
        let wanted = normalize_token(s);
        Self::ALL
            .into_iter()
            .find(|c| normalize_token(c.as_label()) == wanted)
    }
}

impl fmt::Display for SongSortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for SongSortCriterion {
    type Err = CriterionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_label() == s)
            .ok_or_else(|| CriterionParseError(s.to_string()))
    }
}

/// Error when parsing an unknown label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriterionParseError(pub String);

impl fmt::Display for CriterionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown label: {}", self.0)
    }
}

impl std::error::Error for CriterionParseError {}

fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_criterion_labels_round_trip() {
        for criterion in PlaylistSortCriterion::ALL {
            let parsed: PlaylistSortCriterion = criterion.as_label().parse().unwrap();
            assert_eq!(parsed, criterion);
        }
    }

    #[test]
    fn test_song_criterion_labels_are_case_sensitive() {
        assert_eq!(
            "Release Date".parse::<SongSortCriterion>(),
            Ok(SongSortCriterion::ReleaseDate)
        );
        assert!("release date".parse::<SongSortCriterion>().is_err());
        assert!("Number of songs".parse::<PlaylistSortCriterion>().is_err());
    }

    #[test]
    fn test_song_criterion_lenient_accepts_backend_constants() {
        assert_eq!(
            SongSortCriterion::from_lenient("RELEASE_DATE"),
            Some(SongSortCriterion::ReleaseDate)
        );
        assert_eq!(
            SongSortCriterion::from_lenient("recently added"),
            Some(SongSortCriterion::RecentlyAdded)
        );
        assert_eq!(SongSortCriterion::from_lenient("shuffle"), None);
    }

    #[test]
    fn test_visibility_lenient_and_wire_form() {
        assert_eq!(Visibility::from_lenient("public"), Some(Visibility::Public));
        assert_eq!(Visibility::from_lenient("PRIVATE"), Some(Visibility::Private));
        assert_eq!(Visibility::from_lenient("SHARED"), None);
        assert_eq!(
            serde_json::to_string(&Visibility::Public).unwrap(),
            "\"PUBLIC\""
        );
    }

    #[test]
    fn test_criterion_serializes_as_label() {
        let json = serde_json::to_string(&PlaylistSortCriterion::NumberOfSongs).unwrap();
        assert_eq!(json, "\"Number of Songs\"");
        let back: SongSortCriterion = serde_json::from_str("\"Release Date\"").unwrap();
        assert_eq!(back, SongSortCriterion::ReleaseDate);
    }
}
