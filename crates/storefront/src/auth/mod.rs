//! Authentication state.
//!
//! [`AuthStore`] holds at most one current user and publishes every change
//! through a `watch` channel. Credential checks are delegated to an
//! [`IdentityProvider`].
//!
//! Only the user is persisted between requests; see [`AuthStore::snapshot`].

mod error;
mod provider;

pub use error::AuthError;
pub use provider::{IdentityProvider, SimulatedIdentityProvider};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use carter_chaos_core::{Email, UserId};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::instrument;

// =============================================================================
// Types
// =============================================================================

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub has_account: bool,
}

/// Account creation input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Unvalidated email address.
    pub email: String,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Profile fields to overwrite. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub email: Option<Email>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl UserUpdate {
    /// Merge into `user`, returning whether anything changed.
    fn apply(self, user: &mut User) -> bool {
        let mut changed = false;
        changed |= replace(&mut user.email, self.email);
        changed |= replace(&mut user.first_name, self.first_name);
        changed |= replace(&mut user.last_name, self.last_name);
        if let Some(phone) = self.phone
            && user.phone.as_ref() != Some(&phone)
        {
            user.phone = Some(phone);
            changed = true;
        }
        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

/// Observable authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    /// A login or registration is in flight.
    pub is_loading: bool,
}

impl AuthState {
    /// Derived from user presence only.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

// =============================================================================
// AuthStore
// =============================================================================

/// Observable authentication container.
///
/// Clones share state. Concurrent logins are not serialized; whichever
/// completes last determines the user.
pub struct AuthStore<P = SimulatedIdentityProvider> {
    state: Arc<watch::Sender<AuthState>>,
    /// Logins and registrations in flight.
    pending: Arc<AtomicUsize>,
    provider: Arc<P>,
}

impl<P> Clone for AuthStore<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            pending: Arc::clone(&self.pending),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> std::fmt::Debug for AuthStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Holds `is_loading` for one operation. The flag clears when the last
/// overlapping operation finishes or its future is dropped.
///
/// The counter only changes inside the channel's modify closure, so it moves
/// in step with the flag.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<AuthState>,
    pending: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a watch::Sender<AuthState>, pending: &'a AtomicUsize) -> Self {
        state.send_if_modified(|s| {
            pending.fetch_add(1, Ordering::Relaxed);
            !std::mem::replace(&mut s.is_loading, true)
        });
        Self { state, pending }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let last = self.pending.fetch_sub(1, Ordering::Relaxed) == 1;
            last && std::mem::take(&mut s.is_loading)
        });
    }
}

impl<P: IdentityProvider> AuthStore<P> {
    /// A logged-out store.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::from_snapshot(Arc::new(provider), None)
    }

    /// A store restored from a saved user.
    #[must_use]
    pub fn from_snapshot(provider: Arc<P>, user: Option<User>) -> Self {
        let (state, _) = watch::channel(AuthState {
            user,
            is_loading: false,
        });
        Self {
            state: Arc::new(state),
            pending: Arc::new(AtomicUsize::new(0)),
            provider,
        }
    }

    /// The current user, for persisting.
    #[must_use]
    pub fn snapshot(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// A copy of the full state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.snapshot()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Sign in.
    ///
    /// `is_loading` is set while any provider call is pending. On success
    /// the user becomes current; on failure the previous user is kept.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email cannot be parsed, or
    /// whatever the provider rejects with.
    #[instrument(skip(self, email, password), fields(email_domain = tracing::field::Empty))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        tracing::Span::current().record("email_domain", email.domain());

        let guard = LoadingGuard::start(&self.state, &self.pending);
        let user = self.provider.authenticate(email, password).await?;
        self.set_user(user.clone());
        drop(guard);

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email cannot be parsed, or
    /// whatever the provider rejects with.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;

        let guard = LoadingGuard::start(&self.state, &self.pending);
        let user = self.provider.register(email, registration).await?;
        self.set_user(user.clone());
        drop(guard);

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Sign out. Returns whether a user was signed in.
    pub fn logout(&self) -> bool {
        self.state.send_if_modified(|s| s.user.take().is_some())
    }

    /// Merge profile fields into the current user.
    ///
    /// Does nothing when logged out. Returns whether anything changed.
    pub fn update_user(&self, update: UserUpdate) -> bool {
        self.state.send_if_modified(|s| {
            s.user
                .as_mut()
                .is_some_and(|user| update.apply(user))
        })
    }

    fn set_user(&self, user: User) {
        self.state.send_modify(|s| s.user = Some(user));
    }
}
