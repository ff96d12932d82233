//! Error types for Tracklist operations
//!
//! Cache misses are not errors (see `tracklist_storage::CacheLookup`) and
//! normalization never fails, so this taxonomy only covers the failures a
//! caller actually has to handle: the backing store, configuration, and the
//! async collaborators at the I/O boundary.

use thiserror::Error;

/// Backing store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Remove failed for key {key}: {reason}")]
    RemoveFailed { key: String, reason: String },

    #[error("Serialization failed for key {key}: {reason}")]
    SerializationFailed { key: String, reason: String },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Identity provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No authenticated identity")]
    NotAuthenticated,

    #[error("Email address {email} is not verified")]
    EmailNotVerified { email: String },

    #[error("Identity provider failed: {reason}")]
    ProviderFailed { reason: String },
}

/// Remote catalog transport errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {endpoint} failed with status {status}: {message}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Playlist {id} not found")]
    PlaylistNotFound { id: i64 },

    #[error("Transport unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Master error type for all Tracklist errors.
#[derive(Debug, Clone, Error)]
pub enum TracklistError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl TracklistError {
    /// Whether this error came from the backing store.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for Tracklist operations.
pub type TracklistResult<T> = Result<T, TracklistError>;
