//! Lenient normalization of raw catalog payloads.
//!
//! Payloads arrive from sources we do not control (older API versions,
//! third-party imports, hand-edited storage). Every entry point here is
//! total: whatever the input, a fully-populated entity comes out. Each
//! fallback that had to be applied is recorded as a [`NormalizationDefault`]
//! and emitted as a `tracing` debug event.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::{CatalogId, Playlist, Song, SongSortCriterion, Timestamp, Visibility};

/// Placeholder cover for playlists without a usable image.
pub const PLAYLIST_COVER_PLACEHOLDER: &str = "/assets/playlist-cover-placeholder.svg";

/// Placeholder cover for songs without a usable image.
pub const SONG_COVER_PLACEHOLDER: &str = "/assets/song-cover-placeholder.svg";

const IMAGE_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg"];

/// Which placeholder family a cover belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverKind {
    Playlist,
    Song,
}

impl CoverKind {
    pub fn placeholder(&self) -> &'static str {
        match self {
            CoverKind::Playlist => PLAYLIST_COVER_PLACEHOLDER,
            CoverKind::Song => SONG_COVER_PLACEHOLDER,
        }
    }
}

/// Why a default had to be substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultReason {
    /// The field was absent or null.
    Missing,
    /// The field was present but unusable.
    Invalid,
}

/// A fallback applied while normalizing. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationDefault {
    /// Wire path of the field, e.g. `songs[2].releaseDate`.
    pub field: String,
    pub reason: DefaultReason,
}

/// A normalized entity together with the defaults that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub defaults: Vec<NormalizationDefault>,
}

impl<T> Normalized<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    /// True when the input was already well-formed.
    pub fn is_clean(&self) -> bool {
        self.defaults.is_empty()
    }

    pub fn defaulted(&self, field: &str) -> bool {
        self.defaults.iter().any(|d| d.field == field)
    }
}

/// Converts raw JSON payloads into valid entities.
///
/// The normalizer captures a single "now" so every date defaulted during
/// one call lands on the same instant.
#[derive(Debug, Clone, Copy)]
pub struct EntityNormalizer {
    now: Timestamp,
}

impl Default for EntityNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityNormalizer {
    /// Normalizer whose date fallback is the current instant.
    pub fn new() -> Self {
        Self { now: Utc::now() }
    }

    /// Normalizer with a fixed date fallback.
    pub fn at(now: Timestamp) -> Self {
        Self { now }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn song(&self, raw: &Value) -> Song {
        self.song_with_report(raw).into_value()
    }

    pub fn song_with_report(&self, raw: &Value) -> Normalized<Song> {
        let mut rec = Recorder::new("");
        let value = self.build_song(raw, &mut rec);
        rec.finish("song", value)
    }

    pub fn playlist(&self, raw: &Value) -> Playlist {
        self.playlist_with_report(raw).into_value()
    }

    pub fn playlist_with_report(&self, raw: &Value) -> Normalized<Playlist> {
        let mut rec = Recorder::new("");
        let value = self.build_playlist(raw, &mut rec);
        rec.finish("playlist", value)
    }

    /// Normalize a list payload; anything that is not an array yields an
    /// empty collection.
    pub fn playlists(&self, raw: &Value) -> Vec<Playlist> {
        match raw.as_array() {
            Some(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| self.playlist(item))
                .collect(),
            None => {
                tracing::debug!(kind = %json_kind(raw), "playlist list payload is not an array");
                Vec::new()
            }
        }
    }

    fn build_song(&self, raw: &Value, rec: &mut Recorder) -> Song {
        let obj = rec.object(raw);

        let release_date = match date_field(obj, "releaseDate", rec) {
            Some(date) => date,
            None => self.now,
        };
        // An absent add-date is meaningful (song is not in a playlist);
        // only a garbled one falls back to now.
        let add_date = match present(obj, "addDate") {
            None => None,
            Some(value) => match parse_timestamp(value) {
                Some(date) => Some(date),
                None => {
                    rec.invalid("addDate");
                    Some(self.now)
                }
            },
        };

        Song {
            song_id: id_field(obj, "songId", rec),
            title: string_field(obj, "title", rec).unwrap_or_default(),
            artists: string_list_field(obj, "artists", rec),
            album: optional_string_field(obj, "album", rec),
            genres: string_list_field(obj, "genres", rec),
            playtime: count_field(obj, "playtime", rec),
            release_date,
            links_for_web_player: string_list_field(obj, "linksForWebPlayer", rec),
            cover_url: cover_field(obj, CoverKind::Song, rec),
            position_in_playlist: position_field(obj, "positionInPlaylist", rec),
            add_date,
        }
    }

    fn build_playlist(&self, raw: &Value, rec: &mut Recorder) -> Playlist {
        let obj = rec.object(raw);

        let songs = match present(obj, "songs") {
            None => {
                rec.missing("songs");
                Vec::new()
            }
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    if item.is_null() {
                        rec.invalid(&format!("songs[{}]", i));
                        return None;
                    }
                    let mut nested = rec.nested(&format!("songs[{}].", i));
                    let song = self.build_song(item, &mut nested);
                    rec.absorb(nested);
                    Some(song)
                })
                .collect(),
            Some(_) => {
                rec.invalid("songs");
                Vec::new()
            }
        };

        // The backend DTO calls this field `addDate`.
        let date_key = if present(obj, "dateAdded").is_some() {
            "dateAdded"
        } else if present(obj, "addDate").is_some() {
            "addDate"
        } else {
            "dateAdded"
        };
        let date_added = date_field(obj, date_key, rec).unwrap_or(self.now);

        let visibility = match present(obj, "visibility") {
            None => {
                rec.missing("visibility");
                Visibility::default()
            }
            Some(value) => value
                .as_str()
                .and_then(Visibility::from_lenient)
                .unwrap_or_else(|| {
                    rec.invalid("visibility");
                    Visibility::default()
                }),
        };

        let sorting = match present(obj, "sorting") {
            None => {
                rec.missing("sorting");
                SongSortCriterion::default()
            }
            Some(value) => value
                .as_str()
                .and_then(SongSortCriterion::from_lenient)
                .unwrap_or_else(|| {
                    rec.invalid("sorting");
                    SongSortCriterion::default()
                }),
        };

        let number_of_songs = count_field(obj, "numberOfSongs", rec);

        Playlist {
            playlist_id: id_field(obj, "playlistId", rec),
            name: string_field(obj, "playlistName", rec).unwrap_or_default(),
            description: string_field(obj, "description", rec).unwrap_or_default(),
            visibility,
            sorting,
            songs,
            number_of_songs: u32::try_from(number_of_songs).unwrap_or(u32::MAX),
            playtime: count_field(obj, "playtime", rec),
            date_added,
            cover_url: cover_field(obj, CoverKind::Playlist, rec),
        }
    }
}

/// Normalize a raw song with the current instant as date fallback.
pub fn normalize_song(raw: &Value) -> Song {
    EntityNormalizer::new().song(raw)
}

/// Normalize a raw playlist with the current instant as date fallback.
pub fn normalize_playlist(raw: &Value) -> Playlist {
    EntityNormalizer::new().playlist(raw)
}

/// Whether `url` is an absolute http(s) URL whose path names an image file.
pub fn is_valid_image_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let path = parsed.path().to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Return `url` if it is a usable image reference, else the placeholder
/// for `kind`.
pub fn valid_cover_url(url: Option<&str>, kind: CoverKind) -> String {
    match url {
        Some(url) if is_valid_image_url(url) => url.to_string(),
        _ => kind.placeholder().to_string(),
    }
}

/// Parse a loosely-typed date.
///
/// Accepts RFC 3339, `yyyy-MM-ddTHH:mm:ss` (read as UTC), `yyyy-MM-dd`
/// (midnight UTC) and integer epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<Timestamp> {
    let parsed = match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    // Only four-digit years survive an RFC 3339 round trip.
    parsed.filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_timestamp_str(s: &str) -> Option<Timestamp> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ============================================================================
// FIELD READERS
// ============================================================================

struct Recorder {
    prefix: String,
    defaults: Vec<NormalizationDefault>,
}

impl Recorder {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            defaults: Vec::new(),
        }
    }

    fn nested(&self, prefix: &str) -> Self {
        Self::new(&format!("{}{}", self.prefix, prefix))
    }

    fn absorb(&mut self, other: Recorder) {
        self.defaults.extend(other.defaults);
    }

    fn record(&mut self, field: &str, reason: DefaultReason) {
        self.defaults.push(NormalizationDefault {
            field: format!("{}{}", self.prefix, field),
            reason,
        });
    }

    fn missing(&mut self, field: &str) {
        self.record(field, DefaultReason::Missing);
    }

    fn invalid(&mut self, field: &str) {
        self.record(field, DefaultReason::Invalid);
    }

    fn object<'a>(&mut self, raw: &'a Value) -> Option<&'a Map<String, Value>> {
        let obj = raw.as_object();
        if obj.is_none() {
            self.invalid("$");
        }
        obj
    }

    fn finish<T>(self, entity: &'static str, value: T) -> Normalized<T> {
        for d in &self.defaults {
            tracing::debug!(
                entity,
                field = %d.field,
                reason = ?d.reason,
                "normalization default applied"
            );
        }
        Normalized {
            value,
            defaults: self.defaults,
        }
    }
}

fn present<'a>(obj: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    obj.and_then(|o| o.get(name)).filter(|v| !v.is_null())
}

fn string_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Option<String> {
    match present(obj, name) {
        None => {
            rec.missing(name);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            rec.invalid(name);
            None
        }
    }
}

/// Like `string_field`, but absence is normal and blank counts as absent.
fn optional_string_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Option<String> {
    match present(obj, name) {
        None => None,
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(_) => {
            rec.invalid(name);
            None
        }
    }
}

fn string_list_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Vec<String> {
    match present(obj, name) {
        None => {
            rec.missing(name);
            Vec::new()
        }
        Some(Value::Array(items)) => {
            let kept: Vec<String> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if kept.len() != items.len() {
                rec.invalid(name);
            }
            kept
        }
        Some(_) => {
            rec.invalid(name);
            Vec::new()
        }
    }
}

fn id_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Option<CatalogId> {
    let value = present(obj, name)?;
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if id.is_none() {
        rec.invalid(name);
    }
    id
}

fn count_field(obj: Option<&Map<String, Value>>, name: &str, rec: &mut Recorder) -> u64 {
    match present(obj, name) {
        None => {
            rec.missing(name);
            0
        }
        Some(value) => match non_negative(value) {
            Some(n) => n,
            None => {
                rec.invalid(name);
                0
            }
        },
    }
}

/// Position in playlist; the backend sends `-1` for "not in a playlist".
fn position_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Option<u32> {
    let value = present(obj, name)?;
    if value.as_i64().is_some_and(|n| n < 0) {
        return None;
    }
    let position = non_negative(value).and_then(|n| u32::try_from(n).ok());
    if position.is_none() {
        rec.invalid(name);
    }
    position
}

fn non_negative(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

fn date_field(
    obj: Option<&Map<String, Value>>,
    name: &str,
    rec: &mut Recorder,
) -> Option<Timestamp> {
    match present(obj, name) {
        None => {
            rec.missing(name);
            None
        }
        Some(value) => {
            let parsed = parse_timestamp(value);
            if parsed.is_none() {
                rec.invalid(name);
            }
            parsed
        }
    }
}

fn cover_field(obj: Option<&Map<String, Value>>, kind: CoverKind, rec: &mut Recorder) -> String {
    match present(obj, "coverUrl") {
        None => {
            rec.missing("coverUrl");
            kind.placeholder().to_string()
        }
        Some(value) => match value.as_str().filter(|s| is_valid_image_url(s)) {
            Some(url) => url.to_string(),
            None => {
                rec.invalid("coverUrl");
                kind.placeholder().to_string()
            }
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn test_song_with_missing_album_cover_and_bad_date() {
        let raw = json!({
            "songId": 4,
            "title": "Blue in Green",
            "artists": ["Miles Davis"],
            "playtime": 337,
            "releaseDate": "sometime in 1959",
        });
        let normalized = EntityNormalizer::at(fixed_now()).song_with_report(&raw);
        let song = &normalized.value;

        assert_eq!(song.album, None);
        assert_eq!(song.cover_url, SONG_COVER_PLACEHOLDER);
        assert_eq!(song.release_date, fixed_now());
        assert!(normalized.defaulted("releaseDate"));
        assert!(normalized.defaulted("coverUrl"));
    }

    #[test]
    fn test_song_release_date_defaults_to_now_without_fixed_clock() {
        let before = Utc::now();
        let song = normalize_song(&json!({"title": "x", "releaseDate": "not a date"}));
        let after = Utc::now();
        assert!(song.release_date >= before && song.release_date <= after);
    }

    #[test]
    fn test_playlist_with_bad_cover_gets_playlist_placeholder() {
        let playlist = normalize_playlist(&json!({"playlistName": "Mix", "coverUrl": "not-a-url"}));
        assert_eq!(playlist.cover_url, PLAYLIST_COVER_PLACEHOLDER);
        assert_ne!(playlist.cover_url, SONG_COVER_PLACEHOLDER);
    }

    #[test]
    fn test_valid_cover_url_is_kept() {
        let url = "https://cdn.example.com/covers/Evening.JPG?size=large";
        let song = normalize_song(&json!({"coverUrl": url}));
        assert_eq!(song.cover_url, url);
    }

    #[test]
    fn test_image_url_validation() {
        assert!(is_valid_image_url("http://example.com/a.png"));
        assert!(is_valid_image_url("https://example.com/dir/a.webp"));
        assert!(is_valid_image_url("https://example.com/a.SVG"));
        assert!(!is_valid_image_url("ftp://example.com/a.png"));
        assert!(!is_valid_image_url("https://example.com/a.png.txt"));
        assert!(!is_valid_image_url("https://example.com/"));
        assert!(!is_valid_image_url("/assets/local.png"));
        assert!(!is_valid_image_url(""));
    }

    #[test]
    fn test_valid_cover_url_selects_placeholder_by_kind() {
        assert_eq!(valid_cover_url(None, CoverKind::Song), SONG_COVER_PLACEHOLDER);
        assert_eq!(
            valid_cover_url(Some("garbage"), CoverKind::Playlist),
            PLAYLIST_COVER_PLACEHOLDER
        );
    }

    #[test]
    fn test_absent_sequences_become_empty() {
        let playlist = EntityNormalizer::at(fixed_now()).playlist(&json!({}));
        assert!(playlist.songs.is_empty());
        assert_eq!(playlist.number_of_songs, 0);
        assert_eq!(playlist.playtime, 0);
        assert_eq!(playlist.date_added, fixed_now());

        let song = EntityNormalizer::at(fixed_now()).song(&json!({}));
        assert!(song.artists.is_empty());
        assert!(song.genres.is_empty());
        assert!(song.links_for_web_player.is_empty());
        assert_eq!(song.playtime, 0);
        assert_eq!(song.title, "");
    }

    #[test]
    fn test_non_object_input_is_all_defaults() {
        for raw in [json!(null), json!(42), json!("song"), json!([1, 2])] {
            let normalized = EntityNormalizer::at(fixed_now()).song_with_report(&raw);
            assert!(normalized.defaulted("$"));
            assert_eq!(normalized.value.cover_url, SONG_COVER_PLACEHOLDER);
        }
    }

    #[test]
    fn test_artists_drop_blank_and_non_string_entries() {
        let normalized = EntityNormalizer::at(fixed_now())
            .song_with_report(&json!({"artists": ["Björk", "", "  ", 7, null, "Thom Yorke"]}));
        assert_eq!(normalized.value.artists, vec!["Björk", "Thom Yorke"]);
        assert!(normalized.defaulted("artists"));
    }

    #[test]
    fn test_negative_playtime_clamps_to_zero() {
        let song = normalize_song(&json!({"playtime": -30}));
        assert_eq!(song.playtime, 0);
        let song = normalize_song(&json!({"playtime": 212.9}));
        assert_eq!(song.playtime, 212);
    }

    #[test]
    fn test_add_date_absent_stays_absent_garbled_becomes_now() {
        let n = EntityNormalizer::at(fixed_now());
        assert_eq!(n.song(&json!({})).add_date, None);
        assert_eq!(n.song(&json!({"addDate": "yesterday"})).add_date, Some(fixed_now()));
        assert_eq!(
            n.song(&json!({"addDate": "2024-02-29T18:30:00"})).add_date,
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_position_minus_one_means_absent() {
        let n = EntityNormalizer::at(fixed_now());
        assert_eq!(n.song(&json!({"positionInPlaylist": -1})).position_in_playlist, None);
        assert_eq!(n.song(&json!({"positionInPlaylist": 3})).position_in_playlist, Some(3));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2020, 5, 17, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!("2020-05-17")), Some(midnight));
        assert_eq!(parse_timestamp(&json!("2020-05-17T00:00:00")), Some(midnight));
        assert_eq!(parse_timestamp(&json!("2020-05-17T02:00:00+02:00")), Some(midnight));
        assert_eq!(
            parse_timestamp(&json!(midnight.timestamp_millis())),
            Some(midnight)
        );
        assert_eq!(parse_timestamp(&json!("17/05/2020")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
    }

    #[test]
    fn test_parse_timestamp_rejects_five_digit_years() {
        assert_eq!(parse_timestamp(&json!(300_000_000_000_000i64)), None);
        assert_eq!(parse_timestamp(&json!("+12020-05-17T00:00:00Z")), None);
    }

    #[test]
    fn test_playlist_full_payload() {
        let raw = json!({
            "playlistId": 12,
            "playlistName": "Late Night",
            "description": "quiet",
            "visibility": "PUBLIC",
            "sorting": "RELEASE_DATE",
            "songs": [
                {"songId": 1, "title": "A", "artists": ["X"], "playtime": 100, "releaseDate": "2001-01-01"},
                null,
                {"songId": 2, "title": "B", "artists": ["Y"], "playtime": 200, "releaseDate": "2002-01-01"}
            ],
            "numberOfSongs": 2,
            "playtime": 300,
            "addDate": "2025-01-01T10:00:00",
            "coverUrl": "https://img.example.com/late.png"
        });
        let normalized = EntityNormalizer::at(fixed_now()).playlist_with_report(&raw);
        let p = &normalized.value;

        assert_eq!(p.playlist_id, Some(12));
        assert_eq!(p.visibility, Visibility::Public);
        assert_eq!(p.sorting, SongSortCriterion::ReleaseDate);
        assert_eq!(p.songs.len(), 2);
        assert_eq!(p.number_of_songs, 2);
        assert_eq!(p.date_added, Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(p.cover_url, "https://img.example.com/late.png");
        assert!(p.totals_consistent());
        assert!(normalized.defaulted("songs[1]"));
        assert!(normalized.defaulted("songs[0].coverUrl"));
    }

    #[test]
    fn test_unknown_visibility_and_sorting_fall_back() {
        let n = EntityNormalizer::at(fixed_now()).playlist_with_report(&json!({
            "visibility": "SHARED",
            "sorting": "shuffle"
        }));
        assert_eq!(n.value.visibility, Visibility::Private);
        assert_eq!(n.value.sorting, SongSortCriterion::Custom);
        assert!(n.defaulted("visibility"));
        assert!(n.defaulted("sorting"));
    }

    #[test]
    fn test_playlists_list_payload() {
        let n = EntityNormalizer::at(fixed_now());
        assert_eq!(n.playlists(&json!([{"playlistName": "a"}, null, {}])).len(), 2);
        assert!(n.playlists(&json!({"playlists": []})).is_empty());
    }

    #[test]
    fn test_clean_song_has_no_defaults() {
        let raw = json!({
            "songId": 9,
            "title": "So What",
            "artists": ["Miles Davis"],
            "album": "Kind of Blue",
            "genres": ["Jazz"],
            "playtime": 562,
            "releaseDate": "1959-08-17",
            "linksForWebPlayer": ["https://open.example.com/track/9"],
            "coverUrl": "https://img.example.com/kob.jpeg"
        });
        let n = EntityNormalizer::at(fixed_now()).song_with_report(&raw);
        assert!(n.is_clean(), "unexpected defaults: {:?}", n.defaults);
    }
}
