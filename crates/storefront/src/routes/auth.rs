//! Authentication route handlers.
//!
//! Each request restores an [`AuthStore`] from the session user, runs one
//! operation, and persists the resulting user. The session ID is cycled
//! whenever the signed-in identity changes.

use axum::{Json, extract::State};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::auth::{AuthStore, Registration, SimulatedIdentityProvider, User, UserUpdate};
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, RequireUser, clear_current_user, set_current_user};
use crate::state::AppState;

/// Authentication status as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AuthView {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl From<Option<User>> for AuthView {
    fn from(user: Option<User>) -> Self {
        Self {
            is_authenticated: user.is_some(),
            user,
        }
    }
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

fn store(state: &AppState, user: Option<User>) -> AuthStore<SimulatedIdentityProvider> {
    AuthStore::from_snapshot(state.identity(), user)
}

/// Persist a newly signed-in user under a fresh session ID.
async fn sign_in(session: &Session, user: &User) -> Result<()> {
    session.cycle_id().await?;
    set_current_user(session, user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

/// Current authentication status.
///
/// GET /api/auth/me
pub async fn me(OptionalUser(user): OptionalUser) -> Json<AuthView> {
    Json(AuthView::from(user))
}

/// Sign in.
///
/// POST /api/auth/login
#[instrument(skip(state, session, current, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthView>> {
    if request.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let auth = store(&state, current);
    let user = auth
        .login(&request.email, &SecretString::from(request.password))
        .await?;

    sign_in(&session, &user).await?;
    Ok(Json(AuthView::from(auth.snapshot())))
}

/// Create an account and sign in.
///
/// POST /api/auth/register
#[instrument(skip(state, session, current, request))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthView>> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }
    if request.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let registration = Registration {
        email: request.email,
        password: SecretString::from(request.password),
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    };

    let auth = store(&state, current);
    let user = auth.register(&registration).await?;

    sign_in(&session, &user).await?;
    Ok(Json(AuthView::from(auth.snapshot())))
}

/// Sign out.
///
/// POST /api/auth/logout
#[instrument(skip(state, session, current))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(current): OptionalUser,
) -> Result<Json<AuthView>> {
    let auth = store(&state, current);
    if auth.logout() {
        clear_current_user(&session).await?;
        session.cycle_id().await?;
        clear_sentry_user();
        tracing::info!("User logged out");
    }
    Ok(Json(AuthView::from(auth.snapshot())))
}

/// Update the signed-in user's profile.
///
/// PATCH /api/auth/me
#[instrument(skip(state, session, user, update), fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Json(update): Json<UserUpdate>,
) -> Result<Json<AuthView>> {
    let auth = store(&state, Some(user));
    if auth.update_user(update)
        && let Some(user) = auth.snapshot()
    {
        set_current_user(&session, &user).await?;
    }
    Ok(Json(AuthView::from(auth.snapshot())))
}
