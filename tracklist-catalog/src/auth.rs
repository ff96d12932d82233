//! Identity provider seam.
//!
//! The catalog never talks to an identity service directly. It asks an
//! [`AuthProvider`] for a bearer token before every remote fetch.

use async_trait::async_trait;
use std::fmt;
use tracklist_core::TracklistResult;

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub email_verified: bool,
}

/// Opaque access token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Email/password identity provider.
///
/// `register` creates an account and leaves it signed out until the email
/// address is verified. `login` fails with `AuthError::EmailNotVerified`
/// for unverified accounts.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> TracklistResult<Identity>;

    async fn login(&self, email: &str, password: &str) -> TracklistResult<Identity>;

    async fn logout(&self) -> TracklistResult<()>;

    /// The signed-in identity, if any.
    async fn current_identity(&self) -> Option<Identity>;

    /// A token for the signed-in identity, or `AuthError::NotAuthenticated`.
    async fn token(&self) -> TracklistResult<BearerToken>;
}
