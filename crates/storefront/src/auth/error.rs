//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] carter_chaos_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The identity provider failed.
    #[error("identity provider error: {0}")]
    Provider(String),
}

#[cfg(test)]
mod tests {
    use carter_chaos_core::EmailError;

    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(
            AuthError::from(EmailError::MissingAtSymbol).to_string(),
            format!("invalid email: {}", EmailError::MissingAtSymbol)
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "invalid credentials");
        assert_eq!(
            AuthError::Provider("timeout".to_string()).to_string(),
            "identity provider error: timeout"
        );
    }
}
