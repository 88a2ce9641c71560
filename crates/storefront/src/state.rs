//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::SimulatedIdentityProvider;
use crate::config::StorefrontConfig;
use crate::sanity::{SanityClient, SanityError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the content client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    sanity: SanityClient,
    identity: Arc<SimulatedIdentityProvider>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Sanity HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, SanityError> {
        let sanity = SanityClient::new(&config.sanity)?;
        let identity = Arc::new(SimulatedIdentityProvider::new(config.auth_delay));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sanity,
                identity,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Sanity content client.
    #[must_use]
    pub fn sanity(&self) -> &SanityClient {
        &self.inner.sanity
    }

    /// Get a shared handle to the identity provider.
    #[must_use]
    pub fn identity(&self) -> Arc<SimulatedIdentityProvider> {
        Arc::clone(&self.inner.identity)
    }
}
