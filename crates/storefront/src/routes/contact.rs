//! Contact form route handlers.
//!
//! Submissions are validated and logged; delivery is simulated with the
//! configured delay.

use axum::{Json, extract::State};
use carter_chaos_core::Email;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A contact submission with every field trimmed and checked.
#[derive(Debug, PartialEq, Eq)]
struct ValidContact<'a> {
    name: &'a str,
    email: Email,
    subject: &'a str,
    message: &'a str,
}

fn validate(form: &ContactForm) -> Result<ValidContact<'_>> {
    let name = form.name.trim();
    let subject = form.subject.trim();
    let message = form.message.trim();

    if name.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "Name, subject, and message are required.".to_string(),
        ));
    }

    let email = Email::parse(&form.email)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))?;

    Ok(ValidContact {
        name,
        email,
        subject,
        message,
    })
}

/// Submit the contact form.
///
/// POST /api/contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>> {
    let contact = validate(&form)?;

    tokio::time::sleep(state.config().contact_delay).await;

    tracing::info!(
        email_domain = contact.email.domain(),
        name = contact.name,
        subject = contact.subject,
        message_len = contact.message.len(),
        "Contact message received"
    );

    Ok(Json(ContactResponse {
        success: true,
        message: Some("Message sent successfully! We'll get back to you soon.".to_string()),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, subject: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let form = form("  Ada ", " Ada@Example.com ", " Collab ", " Hello there ");
        let contact = validate(&form).unwrap();
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.email.as_str(), "ada@example.com");
        assert_eq!(contact.subject, "Collab");
        assert_eq!(contact.message, "Hello there");
    }

    #[test]
    fn test_validate_requires_every_field() {
        assert!(validate(&form("", "a@example.com", "s", "m")).is_err());
        assert!(validate(&form("n", "a@example.com", "   ", "m")).is_err());
        assert!(validate(&form("n", "a@example.com", "s", "\n")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let err = validate(&form("n", "nope", "s", "m")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad request: Please enter a valid email address."
        );
    }
}
