//! Newsletter subscription route handler.
//!
//! Signups are validated and logged; the mailing list is simulated with the
//! configured delay.

use axum::{Json, extract::State};
use carter_chaos_core::Email;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Newsletter subscription request body.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Response for a subscription.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

fn validate(request: &SubscribeRequest) -> Result<Email> {
    Email::parse(&request.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))
}

/// Subscribe to the newsletter.
///
/// POST /api/newsletter
#[instrument(skip(state, request))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let email = validate(&request)?;

    tokio::time::sleep(state.config().newsletter_delay).await;

    tracing::info!(email_domain = email.domain(), "Newsletter subscription received");

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Welcome to the chaos! Check your email for confirmation.".to_string(),
    }))
}
