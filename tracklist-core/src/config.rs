//! Catalog configuration
//!
//! Loaded from `TRACKLIST_*` environment variables or a TOML document, then
//! checked with [`CatalogConfig::validate`].

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default lifetime of a cached entry (one minute).
pub const DEFAULT_CACHE_TTL_MS: i64 = 60_000;
/// Default namespace prefix for cache keys.
pub const DEFAULT_CACHE_NAMESPACE: &str = "tracklist";
/// Default LMDB map size in megabytes.
pub const DEFAULT_LMDB_MAP_SIZE_MB: usize = 64;
/// Shortest accepted HMAC secret, in bytes.
pub const MIN_SECRET_LEN: usize = 8;

// ============================================================================
// SECRET
// ============================================================================

/// HMAC signing secret. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct CacheSecret(String);

impl CacheSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for CacheSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CacheSecret([REDACTED])")
    }
}

// ============================================================================
// CATALOG CONFIGURATION
// ============================================================================

/// Settings for the signed cache and its backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum age of a cached entry in milliseconds. Zero or negative
    /// makes every entry read as expired.
    pub cache_ttl_ms: i64,

    /// Prefix for every cache key (`namespace:name`).
    pub cache_namespace: String,

    /// HMAC-SHA256 secret used to sign cached envelopes.
    pub cache_secret: CacheSecret,

    /// Directory for the LMDB store. `None` selects the in-memory store.
    pub lmdb_path: Option<PathBuf>,

    /// LMDB map size in megabytes.
    pub lmdb_map_size_mb: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            cache_namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            cache_secret: CacheSecret::default(),
            lmdb_path: None,
            lmdb_map_size_mb: DEFAULT_LMDB_MAP_SIZE_MB,
        }
    }
}

impl CatalogConfig {
    /// Create a config with defaults and the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            cache_secret: CacheSecret::new(secret),
            ..Self::default()
        }
    }

    /// Create CatalogConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TRACKLIST_CACHE_SECRET`: HMAC secret (required)
    /// - `TRACKLIST_CACHE_TTL_MS`: entry lifetime in ms (default: 60000)
    /// - `TRACKLIST_CACHE_NAMESPACE`: key prefix (default: "tracklist")
    /// - `TRACKLIST_LMDB_PATH`: LMDB directory (default: in-memory store)
    /// - `TRACKLIST_LMDB_MAP_SIZE_MB`: LMDB map size (default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cache_secret = lookup("TRACKLIST_CACHE_SECRET")
            .map(CacheSecret::new)
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "TRACKLIST_CACHE_SECRET".to_string(),
            })?;

        let cache_ttl_ms = match lookup("TRACKLIST_CACHE_TTL_MS") {
            Some(raw) => parse_var("TRACKLIST_CACHE_TTL_MS", &raw)?,
            None => defaults.cache_ttl_ms,
        };

        let lmdb_map_size_mb = match lookup("TRACKLIST_LMDB_MAP_SIZE_MB") {
            Some(raw) => parse_var("TRACKLIST_LMDB_MAP_SIZE_MB", &raw)?,
            None => defaults.lmdb_map_size_mb,
        };

        let config = Self {
            cache_ttl_ms,
            cache_namespace: lookup("TRACKLIST_CACHE_NAMESPACE")
                .unwrap_or(defaults.cache_namespace),
            cache_secret,
            lmdb_path: lookup("TRACKLIST_LMDB_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            lmdb_map_size_mb,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_secret.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "cache_secret".to_string(),
            });
        }
        if self.cache_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue {
                field: "cache_secret".to_string(),
                value: "[REDACTED]".to_string(),
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if self.cache_namespace.is_empty() || self.cache_namespace.contains(':') {
            return Err(ConfigError::InvalidValue {
                field: "cache_namespace".to_string(),
                value: self.cache_namespace.clone(),
                reason: "must be non-empty and must not contain ':'".to_string(),
            });
        }
        if self.lmdb_path.is_some() && self.lmdb_map_size_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lmdb_map_size_mb".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// TTL as a duration; `None` when every entry is already expired.
    pub fn cache_ttl(&self) -> Option<Duration> {
        u64::try_from(self.cache_ttl_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// LMDB map size in bytes.
    pub fn lmdb_map_size_bytes(&self) -> usize {
        self.lmdb_map_size_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_var<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        reason: "not a valid number".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = CatalogConfig::default();
        assert_eq!(config.cache_ttl_ms, 60_000);
        assert_eq!(config.cache_namespace, "tracklist");
        assert!(config.lmdb_path.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_secret_validates() {
        let config = CatalogConfig::with_secret("correct-horse");
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = CatalogConfig::with_secret("super-secret-value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = CatalogConfig::with_secret("abc").validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "cache_secret"));
    }

    #[test]
    fn test_namespace_with_separator_rejected() {
        let config = CatalogConfig {
            cache_namespace: "a:b".to_string(),
            ..CatalogConfig::with_secret("correct-horse")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_ttl_has_no_duration() {
        let mut config = CatalogConfig::with_secret("correct-horse");
        config.cache_ttl_ms = 0;
        assert_eq!(config.cache_ttl(), None);
        config.cache_ttl_ms = -5;
        assert_eq!(config.cache_ttl(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_requires_secret() {
        let err = CatalogConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn test_from_lookup_reads_all_vars() {
        let config = CatalogConfig::from_lookup(lookup_from(&[
            ("TRACKLIST_CACHE_SECRET", "correct-horse"),
            ("TRACKLIST_CACHE_TTL_MS", "5000"),
            ("TRACKLIST_CACHE_NAMESPACE", "music"),
            ("TRACKLIST_LMDB_PATH", "/tmp/tracklist"),
            ("TRACKLIST_LMDB_MAP_SIZE_MB", "16"),
        ]))
        .unwrap();
        assert_eq!(config.cache_ttl_ms, 5000);
        assert_eq!(config.cache_namespace, "music");
        assert_eq!(config.lmdb_path, Some(PathBuf::from("/tmp/tracklist")));
        assert_eq!(config.lmdb_map_size_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn test_from_lookup_rejects_bad_number() {
        let err = CatalogConfig::from_lookup(lookup_from(&[
            ("TRACKLIST_CACHE_SECRET", "correct-horse"),
            ("TRACKLIST_CACHE_TTL_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "soon"));
    }

    #[test]
    fn test_from_toml_str() {
        let config = CatalogConfig::from_toml_str(
            r#"
            cache_ttl_ms = 120000
            cache_secret = "correct-horse"
            lmdb_path = "/var/lib/tracklist"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_ttl_ms, 120_000);
        assert_eq!(config.cache_namespace, "tracklist");
        assert_eq!(config.lmdb_path, Some(PathBuf::from("/var/lib/tracklist")));
    }

    #[test]
    fn test_from_toml_str_parse_error() {
        let err = CatalogConfig::from_toml_str("cache_ttl_ms = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
