//! Namespaced cache keys.
//!
//! A `CacheKey` can only be built from a namespace and a name, so the cache
//! never reads or evicts a raw key it did not produce.

use std::fmt;

/// Separator between namespace and name.
const SEPARATOR: char = ':';

/// Name of the key holding the playlist collection.
pub const PLAYLISTS: &str = "playlists";
/// Name of the key holding the current playlist id.
pub const CURRENT_PLAYLIST_ID: &str = "currentPlaylistId";

/// A cache key scoped to a namespace.
///
/// Encodes as `"<namespace>:<name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Private inner data - cannot be constructed externally
    inner: CacheKeyInner,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKeyInner {
    namespace: String,
    name: String,
}

impl CacheKey {
    /// Create a key. Returns `None` if either part is empty or the
    /// namespace contains the separator.
    pub fn new(namespace: &str, name: &str) -> Option<Self> {
        if namespace.is_empty() || name.is_empty() || namespace.contains(SEPARATOR) {
            return None;
        }
        Some(Self {
            inner: CacheKeyInner {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
        })
    }

    /// Key for the playlist collection in `namespace`.
    pub fn playlists(namespace: &str) -> Option<Self> {
        Self::new(namespace, PLAYLISTS)
    }

    /// Key for the current playlist id in `namespace`.
    pub fn current_playlist_id(namespace: &str) -> Option<Self> {
        Self::new(namespace, CURRENT_PLAYLIST_ID)
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The raw store key.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.inner.namespace, SEPARATOR, self.inner.name)
    }

    /// Parse a raw store key. The namespace ends at the first separator.
    pub fn decode(raw: &str) -> Option<Self> {
        let (namespace, name) = raw.split_once(SEPARATOR)?;
        Self::new(namespace, name)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.inner.namespace, SEPARATOR, self.inner.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_getters() {
        let key = CacheKey::new("tracklist", "playlists").unwrap();
        assert_eq!(key.namespace(), "tracklist");
        assert_eq!(key.name(), "playlists");
        assert_eq!(key.encode(), "tracklist:playlists");
        assert_eq!(key.to_string(), key.encode());
    }

    #[test]
    fn test_invalid_parts_rejected() {
        assert!(CacheKey::new("", "playlists").is_none());
        assert!(CacheKey::new("tracklist", "").is_none());
        assert!(CacheKey::new("a:b", "playlists").is_none());
    }

    #[test]
    fn test_name_may_contain_separator() {
        let key = CacheKey::new("tracklist", "playlist:7").unwrap();
        assert_eq!(CacheKey::decode(&key.encode()), Some(key));
    }

    #[test]
    fn test_decode_rejects_unscoped_keys() {
        assert!(CacheKey::decode("playlists").is_none());
        assert!(CacheKey::decode(":playlists").is_none());
    }

    #[test]
    fn test_well_known_keys() {
        assert_eq!(
            CacheKey::playlists("tracklist").unwrap().encode(),
            "tracklist:playlists"
        );
        assert_eq!(
            CacheKey::current_playlist_id("tracklist").unwrap().encode(),
            "tracklist:currentPlaylistId"
        );
    }
}
