//! Deterministic multi-key ordering for playlists and songs.
//!
//! Every sort is a comparator cascade: the requested criterion first, then a
//! fixed list of secondary keys per entity type. Direction is applied once,
//! by swapping the operands before any key is looked at, so all keys share
//! the same effective direction and flipping `ascending` yields exactly the
//! reverse permutation. Elements that tie on every key fall back to their
//! input position under that same direction.
//!
//! Direction policy: ascending means natural order for every key. Text
//! sorts A→Z, numbers small→large, dates oldest→newest. Optional keys
//! (album, add-date, position) treat a missing value as greater than any
//! present one, so missing values trail an ascending sort and lead a
//! descending one.

use std::cmp::Ordering;

use crate::{Playlist, PlaylistSortCriterion, Song, SongSortCriterion};

/// An entity that can be ordered by a named criterion plus a fixed
/// secondary cascade.
pub trait Orderable {
    type Criterion: Copy;

    /// Compare by the primary criterion only.
    fn compare_primary(&self, other: &Self, criterion: Self::Criterion) -> Ordering;

    /// Compare by the fixed secondary keys, in order.
    fn compare_cascade(&self, other: &Self) -> Ordering;
}

/// Full cascade comparison under the given direction.
///
/// `None` as criterion applies only the secondary keys.
pub fn compare<T: Orderable>(
    a: &T,
    b: &T,
    criterion: Option<T::Criterion>,
    ascending: bool,
) -> Ordering {
    let (x, y) = if ascending { (a, b) } else { (b, a) };
    compare_keys(x, y, criterion)
}

fn compare_keys<T: Orderable>(x: &T, y: &T, criterion: Option<T::Criterion>) -> Ordering {
    criterion
        .map_or(Ordering::Equal, |c| x.compare_primary(y, c))
        .then_with(|| x.compare_cascade(y))
}

/// Sort `items` in place.
pub fn sort_by<T: Orderable>(items: &mut Vec<T>, criterion: Option<T::Criterion>, ascending: bool) {
    if items.len() < 2 {
        return;
    }
    let mut indexed: Vec<(usize, T)> = std::mem::take(items).into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        let ((ix, x), (iy, y)) = if ascending {
            ((ia, a), (ib, b))
        } else {
            ((ib, b), (ia, a))
        };
        compare_keys(x, y, criterion).then_with(|| ix.cmp(iy))
    });
    items.extend(indexed.into_iter().map(|(_, item)| item));
}

/// Return a sorted copy, leaving `items` untouched.
pub fn sorted<T: Orderable + Clone>(
    items: &[T],
    criterion: Option<T::Criterion>,
    ascending: bool,
) -> Vec<T> {
    let mut out = items.to_vec();
    sort_by(&mut out, criterion, ascending);
    out
}

pub fn sort_playlists(playlists: &mut Vec<Playlist>, criterion: PlaylistSortCriterion, ascending: bool) {
    sort_by(playlists, Some(criterion), ascending);
}

pub fn sort_songs(songs: &mut Vec<Song>, criterion: SongSortCriterion, ascending: bool) {
    sort_by(songs, Some(criterion), ascending);
}

/// Sort by a case-sensitive label; an unknown label applies only the
/// secondary cascade.
pub fn sort_playlists_by_label(playlists: &mut Vec<Playlist>, label: &str, ascending: bool) {
    let criterion = label.parse::<PlaylistSortCriterion>().ok();
    if criterion.is_none() {
        tracing::debug!(label, "unknown playlist sort label, using secondary keys only");
    }
    sort_by(playlists, criterion, ascending);
}

/// Sort by a case-sensitive label; an unknown label applies only the
/// secondary cascade.
pub fn sort_songs_by_label(songs: &mut Vec<Song>, label: &str, ascending: bool) {
    let criterion = label.parse::<SongSortCriterion>().ok();
    if criterion.is_none() {
        tracing::debug!(label, "unknown song sort label, using secondary keys only");
    }
    sort_by(songs, criterion, ascending);
}

/// Locale-aware text comparison: case-folded first, then by code point so
/// that distinct strings never compare equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Missing values compare greater than every present value.
fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// PLAYLISTS
// ============================================================================

impl Orderable for Playlist {
    type Criterion = PlaylistSortCriterion;

    fn compare_primary(&self, other: &Self, criterion: PlaylistSortCriterion) -> Ordering {
        match criterion {
            PlaylistSortCriterion::Alphabetical => locale_cmp(&self.name, &other.name),
            PlaylistSortCriterion::RecentlyAdded => self.date_added.cmp(&other.date_added),
            PlaylistSortCriterion::NumberOfSongs => self.number_of_songs.cmp(&other.number_of_songs),
            PlaylistSortCriterion::TotalPlaytime => self.playtime.cmp(&other.playtime),
        }
    }

    // name → date-added → song-count → total-playtime
    fn compare_cascade(&self, other: &Self) -> Ordering {
        locale_cmp(&self.name, &other.name)
            .then_with(|| self.date_added.cmp(&other.date_added))
            .then_with(|| self.number_of_songs.cmp(&other.number_of_songs))
            .then_with(|| self.playtime.cmp(&other.playtime))
    }
}

// ============================================================================
// SONGS
// ============================================================================

fn album_cmp(a: &Song, b: &Song) -> Ordering {
    missing_last(a.album.as_deref(), b.album.as_deref(), locale_cmp)
}

fn add_date_cmp(a: &Song, b: &Song) -> Ordering {
    missing_last(a.add_date, b.add_date, |x, y| x.cmp(&y))
}

fn position_cmp(a: &Song, b: &Song) -> Ordering {
    missing_last(a.position_in_playlist, b.position_in_playlist, |x, y| x.cmp(&y))
}

impl Orderable for Song {
    type Criterion = SongSortCriterion;

    fn compare_primary(&self, other: &Self, criterion: SongSortCriterion) -> Ordering {
        match criterion {
            SongSortCriterion::Custom => position_cmp(self, other),
            SongSortCriterion::Title => locale_cmp(&self.title, &other.title),
            SongSortCriterion::Artist => {
                locale_cmp(&self.joined_artists(), &other.joined_artists())
            }
            SongSortCriterion::RecentlyAdded => add_date_cmp(self, other),
            SongSortCriterion::ReleaseDate => self.release_date.cmp(&other.release_date),
            SongSortCriterion::Playtime => self.playtime.cmp(&other.playtime),
            SongSortCriterion::Album => album_cmp(self, other),
        }
    }

    // title → album → artists → release-date → add-date → playtime → position
    fn compare_cascade(&self, other: &Self) -> Ordering {
        locale_cmp(&self.title, &other.title)
            .then_with(|| album_cmp(self, other))
            .then_with(|| locale_cmp(&self.joined_artists(), &other.joined_artists()))
            .then_with(|| self.release_date.cmp(&other.release_date))
            .then_with(|| add_date_cmp(self, other))
            .then_with(|| self.playtime.cmp(&other.playtime))
            .then_with(|| position_cmp(self, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Timestamp, Visibility};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn playlist(id: i64, name: &str, songs: u32) -> Playlist {
        Playlist {
            playlist_id: Some(id),
            name: name.to_string(),
            description: String::new(),
            visibility: Visibility::Private,
            sorting: SongSortCriterion::Custom,
            songs: vec![],
            number_of_songs: songs,
            playtime: 0,
            date_added: day(1),
            cover_url: String::new(),
        }
    }

    fn song(id: i64, title: &str) -> Song {
        Song {
            song_id: Some(id),
            title: title.to_string(),
            artists: vec![],
            album: None,
            genres: vec![],
            playtime: 0,
            release_date: day(1),
            links_for_web_player: vec![],
            cover_url: String::new(),
            position_in_playlist: None,
            add_date: None,
        }
    }

    fn playlist_ids(items: &[Playlist]) -> Vec<i64> {
        items.iter().filter_map(|p| p.playlist_id).collect()
    }

    fn song_ids(items: &[Song]) -> Vec<i64> {
        items.iter().filter_map(|s| s.song_id).collect()
    }

    #[test]
    fn test_number_of_songs_both_directions() {
        let input = vec![playlist(1, "P1", 5), playlist(2, "P2", 2), playlist(3, "P3", 8)];

        let mut asc = input.clone();
        sort_playlists(&mut asc, PlaylistSortCriterion::NumberOfSongs, true);
        assert_eq!(playlist_ids(&asc), vec![2, 1, 3]);

        let mut desc = input;
        sort_playlists(&mut desc, PlaylistSortCriterion::NumberOfSongs, false);
        assert_eq!(playlist_ids(&desc), vec![3, 1, 2]);
    }

    #[test]
    fn test_alphabetical_is_case_insensitive_a_to_z() {
        let mut items = vec![
            playlist(1, "zebra", 0),
            playlist(2, "Apple", 0),
            playlist(3, "mango", 0),
        ];
        sort_playlists(&mut items, PlaylistSortCriterion::Alphabetical, true);
        assert_eq!(playlist_ids(&items), vec![2, 3, 1]);
    }

    #[test]
    fn test_secondary_key_uses_same_direction() {
        // Same song count, names decide; descending must reverse names too.
        let input = vec![playlist(1, "b", 3), playlist(2, "a", 3), playlist(3, "c", 1)];

        let asc = sorted(&input, Some(PlaylistSortCriterion::NumberOfSongs), true);
        assert_eq!(playlist_ids(&asc), vec![3, 2, 1]);

        let desc = sorted(&input, Some(PlaylistSortCriterion::NumberOfSongs), false);
        assert_eq!(playlist_ids(&desc), vec![1, 2, 3]);
    }

    #[test]
    fn test_full_ties_reverse_exactly() {
        let input = vec![playlist(1, "same", 1), playlist(2, "same", 1), playlist(3, "same", 1)];
        let asc = sorted(&input, Some(PlaylistSortCriterion::TotalPlaytime), true);
        let desc = sorted(&input, Some(PlaylistSortCriterion::TotalPlaytime), false);
        assert_eq!(playlist_ids(&asc), vec![1, 2, 3]);
        assert_eq!(playlist_ids(&desc), vec![3, 2, 1]);
    }

    #[test]
    fn test_empty_and_single_are_noops() {
        let mut empty: Vec<Song> = vec![];
        sort_songs(&mut empty, SongSortCriterion::Title, true);
        assert!(empty.is_empty());

        let mut one = vec![song(1, "x")];
        sort_songs(&mut one, SongSortCriterion::Album, false);
        assert_eq!(song_ids(&one), vec![1]);
    }

    #[test]
    fn test_missing_album_trails_ascending_and_leads_descending() {
        let mut with_album = song(1, "t");
        with_album.album = Some("Blue".to_string());
        let without = song(2, "t");
        let mut other_album = song(3, "t");
        other_album.album = Some("Abbey Road".to_string());
        let input = vec![with_album, without, other_album];

        let asc = sorted(&input, Some(SongSortCriterion::Album), true);
        assert_eq!(song_ids(&asc), vec![3, 1, 2]);

        let desc = sorted(&input, Some(SongSortCriterion::Album), false);
        assert_eq!(song_ids(&desc), vec![2, 1, 3]);
    }

    #[test]
    fn test_custom_order_uses_position() {
        let mut a = song(1, "a");
        a.position_in_playlist = Some(2);
        let mut b = song(2, "b");
        b.position_in_playlist = Some(0);
        let c = song(3, "c");
        let mut d = song(4, "d");
        d.position_in_playlist = Some(1);

        let asc = sorted(&[a, b, c, d], Some(SongSortCriterion::Custom), true);
        assert_eq!(song_ids(&asc), vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_artist_criterion_compares_joined_names() {
        let mut a = song(1, "x");
        a.artists = vec!["Miles Davis".to_string(), "John Coltrane".to_string()];
        let mut b = song(2, "x");
        b.artists = vec!["Miles Davis".to_string()];
        let mut c = song(3, "x");
        c.artists = vec!["Alice Coltrane".to_string()];

        let asc = sorted(&[a, b, c], Some(SongSortCriterion::Artist), true);
        assert_eq!(song_ids(&asc), vec![3, 2, 1]);
    }

    #[test]
    fn test_unknown_label_uses_cascade_only() {
        let mut items = vec![song(1, "b"), song(2, "a")];
        sort_songs_by_label(&mut items, "Shuffle", true);
        assert_eq!(song_ids(&items), vec![2, 1]);

        let mut items = vec![playlist(1, "P1", 5), playlist(2, "P2", 2)];
        sort_playlists_by_label(&mut items, "Number of Songs", true);
        assert_eq!(playlist_ids(&items), vec![2, 1]);
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("abc", "ABD"), Ordering::Less);
        assert_eq!(locale_cmp("Zed", "alpha"), Ordering::Greater);
        assert_ne!(locale_cmp("Abc", "abc"), Ordering::Equal);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    fn arb_song() -> impl Strategy<Value = Song> {
        (
            0i64..1000,
            "[a-cA-C]{0,2}",
            proptest::option::of("[a-b]{0,1}"),
            proptest::collection::vec("[x-z]{1,2}", 0..2),
            0u64..3,
            1u32..3,
            proptest::option::of(1u32..3),
            proptest::option::of(0u32..3),
        )
            .prop_map(|(id, title, album, artists, playtime, rd, ad, pos)| Song {
                song_id: Some(id),
                title,
                artists,
                album,
                genres: vec![],
                playtime,
                release_date: day(rd),
                links_for_web_player: vec![],
                cover_url: String::new(),
                position_in_playlist: pos,
                add_date: ad.map(day),
            })
    }

    fn arb_song_criterion() -> impl Strategy<Value = SongSortCriterion> {
        proptest::sample::select(SongSortCriterion::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_song_reversal_law(
            songs in proptest::collection::vec(arb_song(), 0..12),
            criterion in arb_song_criterion(),
        ) {
            let asc = sorted(&songs, Some(criterion), true);
            let mut desc = sorted(&songs, Some(criterion), false);
            desc.reverse();
            prop_assert_eq!(asc, desc);
        }

        #[test]
        fn prop_song_sort_is_deterministic(
            songs in proptest::collection::vec(arb_song(), 0..12),
            criterion in arb_song_criterion(),
            ascending in any::<bool>(),
        ) {
            let first = sorted(&songs, Some(criterion), ascending);
            let second = sorted(&songs, Some(criterion), ascending);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_song_sort_respects_comparator(
            songs in proptest::collection::vec(arb_song(), 0..12),
            criterion in arb_song_criterion(),
            ascending in any::<bool>(),
        ) {
            let out = sorted(&songs, Some(criterion), ascending);
            prop_assert_eq!(out.len(), songs.len());
            for pair in out.windows(2) {
                prop_assert_ne!(
                    compare(&pair[0], &pair[1], Some(criterion), ascending),
                    Ordering::Greater
                );
            }
        }
    }
}
