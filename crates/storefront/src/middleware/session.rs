//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions over a `moka` cache. Each
//! record is evicted once its expiry date passes, and the cache is bounded,
//! so abandoned carts do not accumulate. Cart and auth snapshots live only as
//! long as the process.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cc_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Upper bound on live session records.
const SESSION_STORE_CAPACITY: u64 = 100_000;

/// Create the session store. Records expire at their own expiry date.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_STORE_CAPACITY))
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
