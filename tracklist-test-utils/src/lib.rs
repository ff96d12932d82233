//! Tracklist Test Utilities
//!
//! Shared test infrastructure for the Tracklist workspace:
//! - Mock identity provider, transport and a store that fails on demand
//! - Proptest generators for entities and raw payloads
//! - Test fixtures for common scenarios
//! - Custom assertions for Tracklist results

pub use tracklist_catalog::{
    AuthProvider, BearerToken, CatalogContext, CatalogRepository, CatalogTransport, Identity,
};
pub use tracklist_core::{
    AuthError, CacheSecret, CatalogConfig, CatalogId, Playlist, PlaylistSortCriterion, Song,
    SongSortCriterion, StorageError, Timestamp, TracklistError, TracklistResult, TransportError,
    Visibility,
};
pub use tracklist_storage::{InMemoryStore, KeyValueStore, ManualClock};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK COLLABORATORS
// ============================================================================

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
    email_verified: bool,
}

/// In-memory email/password identity provider.
#[derive(Debug, Default)]
pub struct MockAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Identity>>,
    token_requests: AtomicUsize,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with one verified account that is already signed in.
    pub fn signed_in(email: &str) -> Self {
        let provider = Self::new();
        let identity = Identity {
            user_id: format!("user-{}", email),
            email: email.to_string(),
            email_verified: true,
        };
        if let Ok(mut accounts) = provider.accounts.lock() {
            accounts.insert(
                email.to_string(),
                Account {
                    user_id: identity.user_id.clone(),
                    password: String::new(),
                    email_verified: true,
                },
            );
        }
        if let Ok(mut current) = provider.current.lock() {
            *current = Some(identity);
        }
        provider
    }

    /// Mark an account's email address as verified.
    pub fn verify_email(&self, email: &str) {
        if let Ok(mut accounts) = self.accounts.lock() {
            if let Some(account) = accounts.get_mut(email) {
                account.email_verified = true;
            }
        }
    }

    /// Number of `token()` calls so far.
    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    fn provider_failed() -> TracklistError {
        AuthError::ProviderFailed {
            reason: "mock state poisoned".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn register(&self, email: &str, password: &str) -> TracklistResult<Identity> {
        let mut accounts = self.accounts.lock().map_err(|_| Self::provider_failed())?;
        if accounts.contains_key(email) {
            return Err(AuthError::ProviderFailed {
                reason: format!("account {} already exists", email),
            }
            .into());
        }
        let account = Account {
            user_id: format!("user-{}", accounts.len() + 1),
            password: password.to_string(),
            email_verified: false,
        };
        let identity = Identity {
            user_id: account.user_id.clone(),
            email: email.to_string(),
            email_verified: false,
        };
        accounts.insert(email.to_string(), account);
        Ok(identity)
    }

    async fn login(&self, email: &str, password: &str) -> TracklistResult<Identity> {
        let account = {
            let accounts = self.accounts.lock().map_err(|_| Self::provider_failed())?;
            accounts.get(email).cloned()
        };
        let account = match account {
            Some(account) if account.password == password => account,
            _ => {
                return Err(AuthError::ProviderFailed {
                    reason: "invalid credentials".to_string(),
                }
                .into())
            }
        };
        if !account.email_verified {
            return Err(AuthError::EmailNotVerified {
                email: email.to_string(),
            }
            .into());
        }
        let identity = Identity {
            user_id: account.user_id,
            email: email.to_string(),
            email_verified: true,
        };
        let mut current = self.current.lock().map_err(|_| Self::provider_failed())?;
        *current = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) -> TracklistResult<()> {
        let mut current = self.current.lock().map_err(|_| Self::provider_failed())?;
        *current = None;
        Ok(())
    }

    async fn current_identity(&self) -> Option<Identity> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    async fn token(&self) -> TracklistResult<BearerToken> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        match self.current_identity().await {
            Some(identity) => Ok(BearerToken::new(format!("token-{}", identity.user_id))),
            None => Err(AuthError::NotAuthenticated.into()),
        }
    }
}

/// Transport serving canned JSON and counting calls.
#[derive(Debug, Default)]
pub struct MockTransport {
    playlists: Mutex<Value>,
    singles: Mutex<HashMap<CatalogId, Value>>,
    fail: AtomicBool,
    list_calls: AtomicUsize,
    single_calls: AtomicUsize,
}

impl MockTransport {
    /// Serve `playlists` as the list response.
    pub fn with_playlists(playlists: Value) -> Self {
        Self {
            playlists: Mutex::new(playlists),
            ..Self::default()
        }
    }

    /// Serve `playlist` for `fetch_playlist(id)`.
    pub fn insert_single(&self, id: CatalogId, playlist: Value) {
        if let Ok(mut singles) = self.singles.lock() {
            singles.insert(id, playlist);
        }
    }

    pub fn set_playlists(&self, playlists: Value) {
        if let Ok(mut current) = self.playlists.lock() {
            *current = playlists;
        }
    }

    /// Make every call fail with a 503.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self, endpoint: String) -> TracklistResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::RequestFailed {
                endpoint,
                status: 503,
                message: "service unavailable".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn unavailable() -> TracklistError {
        TransportError::Unavailable {
            reason: "mock state poisoned".to_string(),
        }
        .into()
    }
}

#[async_trait]
impl CatalogTransport for MockTransport {
    async fn fetch_playlists(&self, _token: &BearerToken) -> TracklistResult<Value> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(tracklist_catalog::PLAYLISTS_ENDPOINT.to_string())?;
        let playlists = self.playlists.lock().map_err(|_| Self::unavailable())?;
        Ok(playlists.clone())
    }

    async fn fetch_playlist(&self, _token: &BearerToken, id: CatalogId) -> TracklistResult<Value> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available(tracklist_catalog::playlist_endpoint(id))?;
        let singles = self.singles.lock().map_err(|_| Self::unavailable())?;
        singles
            .get(&id)
            .cloned()
            .ok_or_else(|| TransportError::PlaylistNotFound { id }.into())
    }
}

/// An in-memory store whose operations can be made to fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every operation fails.
    pub fn always_failing() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store.set_fail_removes(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

impl KeyValueStore for FailingStore {
    fn read(&self, key: &str) -> TracklistResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> TracklistResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        self.inner.write(key, value)
    }

    fn remove(&self, key: &str) -> TracklistResult<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(StorageError::RemoveFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        self.inner.remove(key)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for entities and raw payloads.

    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Generate a Timestamp (DateTime<Utc>) between 2000 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (946_684_800i64..1_893_456_000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or(chrono::DateTime::UNIX_EPOCH)
        })
    }

    pub fn arb_visibility() -> impl Strategy<Value = Visibility> {
        prop_oneof![Just(Visibility::Public), Just(Visibility::Private)]
    }

    pub fn arb_song_criterion() -> impl Strategy<Value = SongSortCriterion> {
        proptest::sample::select(SongSortCriterion::ALL.to_vec())
    }

    pub fn arb_playlist_criterion() -> impl Strategy<Value = PlaylistSortCriterion> {
        proptest::sample::select(PlaylistSortCriterion::ALL.to_vec())
    }

    /// Short names from a small alphabet so that ties are common.
    fn arb_name() -> impl Strategy<Value = String> {
        "[a-cA-C ]{0,3}"
    }

    /// A valid Song. Fields are drawn from small domains to exercise ties.
    pub fn arb_song() -> impl Strategy<Value = Song> {
        (
            proptest::option::of(0i64..50),
            arb_name(),
            prop::collection::vec("[a-c]{1,2}", 0..3),
            proptest::option::of(arb_name()),
            0u64..4,
            arb_timestamp(),
            proptest::option::of(0u32..4),
            proptest::option::of(arb_timestamp()),
        )
            .prop_map(
                |(song_id, title, artists, album, playtime, release_date, position, add_date)| {
                    Song {
                        song_id,
                        title,
                        artists,
                        album,
                        genres: vec![],
                        playtime,
                        release_date,
                        links_for_web_player: vec![],
                        cover_url: tracklist_core::SONG_COVER_PLACEHOLDER.to_string(),
                        position_in_playlist: position,
                        add_date,
                    }
                },
            )
    }

    /// A valid Playlist with a handful of songs.
    pub fn arb_playlist() -> impl Strategy<Value = Playlist> {
        (
            proptest::option::of(0i64..50),
            arb_name(),
            arb_visibility(),
            arb_song_criterion(),
            prop::collection::vec(arb_song(), 0..4),
            0u32..5,
            0u64..5,
            arb_timestamp(),
        )
            .prop_map(
                |(playlist_id, name, visibility, sorting, songs, number_of_songs, playtime, date_added)| {
                    Playlist {
                        playlist_id,
                        name,
                        description: String::new(),
                        visibility,
                        sorting,
                        songs,
                        number_of_songs,
                        playtime,
                        date_added,
                        cover_url: tracklist_core::PLAYLIST_COVER_PLACEHOLDER.to_string(),
                    }
                },
            )
    }

    /// Any JSON value, shallow.
    pub fn arb_json_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            ".{0,12}".prop_map(Value::from),
        ]
    }

    /// A field value that is sometimes well-formed and often not.
    fn arb_loose(good: impl Strategy<Value = Value> + 'static) -> impl Strategy<Value = Value> {
        prop_oneof![
            2 => good,
            1 => arb_json_scalar(),
            1 => prop::collection::vec(arb_json_scalar(), 0..3).prop_map(Value::from),
        ]
    }

    /// A loosely-typed song payload as a remote API might send it.
    pub fn arb_raw_song() -> impl Strategy<Value = Value> {
        (
            arb_loose((0i64..1000).prop_map(Value::from)),
            arb_loose(".{0,10}".prop_map(Value::from)),
            arb_loose(prop::collection::vec(".{0,6}", 0..3).prop_map(Value::from)),
            arb_loose(".{0,10}".prop_map(Value::from)),
            arb_loose((-100i64..1000).prop_map(Value::from)),
            arb_loose(Just(json!("2021-07-04"))),
            arb_loose(Just(json!("https://img.example.com/c.png"))),
            arb_loose((-2i64..10).prop_map(Value::from)),
            arb_loose(Just(json!("2024-01-01T10:00:00Z"))),
        )
            .prop_map(
                |(id, title, artists, album, playtime, release, cover, position, added)| {
                    json!({
                        "songId": id,
                        "title": title,
                        "artists": artists,
                        "album": album,
                        "playtime": playtime,
                        "releaseDate": release,
                        "coverUrl": cover,
                        "positionInPlaylist": position,
                        "addDate": added,
                    })
                },
            )
    }

    /// A loosely-typed playlist payload.
    pub fn arb_raw_playlist() -> impl Strategy<Value = Value> {
        (
            arb_loose((0i64..1000).prop_map(Value::from)),
            arb_loose(".{0,10}".prop_map(Value::from)),
            arb_loose(prop_oneof![Just(json!("PUBLIC")), Just(json!("private")), Just(json!("SHARED"))]),
            arb_loose(prop_oneof![Just(json!("Title")), Just(json!("RELEASE_DATE"))]),
            arb_loose(prop::collection::vec(arb_raw_song(), 0..3).prop_map(Value::from)),
            arb_loose((-5i64..20).prop_map(Value::from)),
            arb_loose(Just(json!("2023-12-24T18:00:00Z"))),
            arb_loose(Just(json!("not-a-url"))),
        )
            .prop_map(
                |(id, name, visibility, sorting, songs, count, date, cover)| {
                    json!({
                        "playlistId": id,
                        "playlistName": name,
                        "visibility": visibility,
                        "sorting": sorting,
                        "songs": songs,
                        "numberOfSongs": count,
                        "dateAdded": date,
                        "coverUrl": cover,
                    })
                },
            )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    pub const TEST_SECRET: &str = "tracklist-test-secret";

    pub fn test_secret() -> CacheSecret {
        CacheSecret::new(TEST_SECRET)
    }

    /// A valid config with the test secret and the in-memory store.
    pub fn test_config() -> CatalogConfig {
        CatalogConfig::with_secret(TEST_SECRET)
    }

    /// A fixed instant used as "now" in tests.
    pub fn fixed_now() -> Timestamp {
        chrono::Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// A raw song payload with every field present and valid.
    pub fn raw_song(id: CatalogId, title: &str, playtime: u64) -> Value {
        json!({
            "songId": id,
            "title": title,
            "artists": ["Nina Simone"],
            "album": "I Put a Spell on You",
            "genres": ["Jazz"],
            "playtime": playtime,
            "releaseDate": "1965-06-01",
            "linksForWebPlayer": ["https://player.example.com/track"],
            "coverUrl": "https://img.example.com/cover.jpg",
            "positionInPlaylist": id,
            "addDate": "2024-01-15T08:30:00Z",
        })
    }

    /// A raw playlist payload in the backend's shape.
    pub fn raw_playlist(id: CatalogId, name: &str, songs: Vec<Value>) -> Value {
        let count = songs.len();
        json!({
            "playlistId": id,
            "playlistName": name,
            "description": "",
            "visibility": "PUBLIC",
            "sorting": "CUSTOM",
            "songs": songs,
            "numberOfSongs": count,
            "playtime": 0,
            "addDate": "2024-01-01T00:00:00",
            "coverUrl": "https://img.example.com/playlist.png",
        })
    }

    /// Three playlists with 5, 2 and 8 songs.
    pub fn raw_catalog() -> Value {
        let songs = |n: i64| -> Vec<Value> {
            (0..n).map(|i| raw_song(i, &format!("Song {}", i), 180)).collect()
        };
        json!([
            raw_playlist(1, "Morning", songs(5)),
            raw_playlist(2, "Commute", songs(2)),
            raw_playlist(3, "Evening", songs(8)),
        ])
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for Tracklist results.

    use super::*;

    /// Assert that a TracklistResult is a Storage error.
    #[track_caller]
    pub fn assert_storage_error<T: std::fmt::Debug>(result: &TracklistResult<T>) {
        match result {
            Err(TracklistError::Storage(_)) => {}
            other => panic!("Expected Storage error, got: {:?}", other),
        }
    }

    /// Assert that a TracklistResult is an Auth error.
    #[track_caller]
    pub fn assert_auth_error<T: std::fmt::Debug>(result: &TracklistResult<T>) {
        match result {
            Err(TracklistError::Auth(_)) => {}
            other => panic!("Expected Auth error, got: {:?}", other),
        }
    }

    /// Assert that a TracklistResult is a Transport error.
    #[track_caller]
    pub fn assert_transport_error<T: std::fmt::Debug>(result: &TracklistResult<T>) {
        match result {
            Err(TracklistError::Transport(_)) => {}
            other => panic!("Expected Transport error, got: {:?}", other),
        }
    }

    /// Assert that a TracklistResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &TracklistResult<T>) {
        match result {
            Err(TracklistError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that the ids of `playlists` are exactly `expected`, in order.
    #[track_caller]
    pub fn assert_playlist_ids(playlists: &[Playlist], expected: &[CatalogId]) {
        let ids: Vec<Option<CatalogId>> = playlists.iter().map(|p| p.playlist_id).collect();
        let expected: Vec<Option<CatalogId>> = expected.iter().copied().map(Some).collect();
        assert_eq!(ids, expected, "playlist order mismatch");
    }
}
