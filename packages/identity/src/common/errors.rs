use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors for the Shopfront identity core
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("No authentication token provided")]
    NoToken,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Principal not found")]
    PrincipalNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Verification code mismatch")]
    CodeMismatch,

    #[error("Verification code expired")]
    ChallengeExpired,

    #[error("No pending verification code")]
    ChallengeNotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Whether this is one of the authentication sub-cases.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AuthError::NoToken
                | AuthError::TokenInvalid
                | AuthError::TokenExpired
                | AuthError::TokenRevoked
                | AuthError::PrincipalNotFound
                | AuthError::InvalidCredentials
                | AuthError::CodeMismatch
                | AuthError::ChallengeExpired
                | AuthError::ChallengeNotFound
        )
    }

    /// Message safe to return to a client.
    ///
    /// Authentication sub-cases collapse to a single message so callers
    /// cannot probe which check failed (e.g. enumerate registered phone
    /// numbers through the challenge endpoints).
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) | AuthError::Conflict(msg) => msg.clone(),
            AuthError::Forbidden => "Forbidden".to_string(),
            AuthError::Database(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => "Invalid or expired credentials".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if matches!(self, AuthError::Database(_) | AuthError::Internal(_)) {
            tracing::error!("Request failed: {}", self);
        }
        (self.status_code(), self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_authentication_errors_share_public_message() {
        let errors = [
            AuthError::NoToken,
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
            AuthError::PrincipalNotFound,
            AuthError::InvalidCredentials,
            AuthError::CodeMismatch,
            AuthError::ChallengeExpired,
            AuthError::ChallengeNotFound,
        ];

        for error in errors {
            assert!(error.is_authentication());
            assert_eq!(
                error.public_message(),
                "Invalid or expired credentials",
                "{:?} should not leak its sub-case",
                error
            );
            assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_validation_message_is_user_facing() {
        let error = AuthError::Validation("Invalid mobile number: 12345".to_string());
        assert_eq!(error.public_message(), "Invalid mobile number: 12345");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(!error.is_authentication());
    }

    #[test]
    fn test_conflict_is_distinct_from_authentication() {
        let error = AuthError::Conflict("An account already exists for 9812345678".to_string());
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert!(!error.is_authentication());
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let error = AuthError::Internal(anyhow!("connection refused"));
        assert_eq!(error.public_message(), "Internal server error");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
