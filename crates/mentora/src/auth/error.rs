//! Authentication errors.
//!
//! The wire format is a bare `{"message": "..."}` body; clients match on the
//! message strings, so they are part of the API contract and must not change.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No Authorization header, non-Bearer scheme, or empty token segment.
    #[error("No token provided")]
    NoToken,

    /// Signature, expiry, or payload validation failed.
    #[error("Invalid token")]
    InvalidToken,

    /// Token verified but carries no recognized subject identifier.
    #[error("Token invalid: Missing user ID")]
    MissingSubject,

    /// Identity is valid but its role is not accepted for the route.
    #[error("User role is not authorized")]
    RoleNotAuthorized,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub message: String,
}

impl AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoToken | AuthError::InvalidToken | AuthError::MissingSubject => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::RoleNotAuthorized => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorResponse {
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(AuthError::NoToken.to_string(), "No token provided");
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(
            AuthError::MissingSubject.to_string(),
            "Token invalid: Missing user ID"
        );
        assert_eq!(
            AuthError::RoleNotAuthorized.to_string(),
            "User role is not authorized"
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(AuthError::NoToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::MissingSubject.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::RoleNotAuthorized.status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
