//! Identity providers.
//!
//! [`IdentityProvider`] is the boundary to whatever verifies credentials.
//! [`SimulatedIdentityProvider`] is a stand-in that accepts everything after
//! a fixed delay; it performs no verification at all.

use std::future::Future;
use std::time::Duration;

use carter_chaos_core::{Email, UserId};
use secrecy::SecretString;

use super::{AuthError, Registration, User};

/// Verifies credentials and creates accounts.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Resolve the user for an email and password.
    fn authenticate(
        &self,
        email: Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Create an account. `email` is the validated form of
    /// `registration.email`.
    fn register(
        &self,
        email: Email,
        registration: &Registration,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;
}

/// Provider that waits a fixed delay and then succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedIdentityProvider {
    delay: Duration,
}

impl Default for SimulatedIdentityProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl SimulatedIdentityProvider {
    /// Delay used when none is configured.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().to_string())
}

impl IdentityProvider for SimulatedIdentityProvider {
    async fn authenticate(&self, email: Email, _password: &SecretString) -> Result<User, AuthError> {
        tokio::time::sleep(self.delay).await;
        Ok(User {
            id: new_user_id(),
            email,
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            phone: None,
            has_account: true,
        })
    }

    async fn register(&self, email: Email, registration: &Registration) -> Result<User, AuthError> {
        tokio::time::sleep(self.delay).await;
        Ok(User {
            id: new_user_id(),
            email,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            phone: registration
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            has_account: true,
        })
    }
}
