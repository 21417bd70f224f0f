//! # Auth Errors
//!
//! Error types for the bearer token gate.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Bearer token rejections
///
/// A malformed header and a missing one are reported the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer ...` header
    #[error("Unauthorized: No Bearer token provided")]
    MissingToken,

    /// A bearer token was presented but does not match the secret
    #[error("Unauthorized: Invalid token")]
    InvalidToken,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken => 401,
            AuthError::InvalidToken => 401,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), 401);
        assert_eq!(AuthError::InvalidToken.status_code(), 401);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AuthError::MissingToken.to_string(),
            "Unauthorized: No Bearer token provided"
        );
        assert_eq!(
            AuthError::InvalidToken.to_string(),
            "Unauthorized: Invalid token"
        );
    }
}
