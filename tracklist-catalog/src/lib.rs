//! Tracklist Catalog - Playlist Facade
//!
//! Ties the signed cache, the normalizer and the ordering engine to an
//! identity provider and a remote transport, and exposes the loaded
//! catalog as observable state.

pub mod auth;
pub mod context;
pub mod repository;
pub mod state;
pub mod telemetry;
pub mod transport;

pub use auth::{AuthProvider, BearerToken, Identity};
pub use context::{CatalogCache, CatalogContext};
pub use repository::{CatalogRepository, RestoreOutcome};
pub use state::CatalogState;
pub use telemetry::{init_tracing, TelemetryConfig};
pub use transport::{playlist_endpoint, CatalogTransport, PLAYLISTS_ENDPOINT};
