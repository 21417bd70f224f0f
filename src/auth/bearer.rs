//! # Bearer Token Gate
//!
//! One static secret, loaded at startup, grants access to every file.
//! There are no sessions, no expiry and no per-user identity.

use std::fmt;

use super::crypto::constant_time_str_eq;
use super::errors::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Checks `Authorization` header values against the configured secret
#[derive(Clone)]
pub struct BearerAuth {
    secret: String,
}

impl BearerAuth {
    /// Create a gate for the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Validate a raw `Authorization` header value.
    ///
    /// The token is the text after `Bearer ` up to the next space.
    pub fn check(&self, header: Option<&str>) -> AuthResult<()> {
        let rest = header
            .and_then(|h| h.strip_prefix(BEARER_PREFIX))
            .ok_or(AuthError::MissingToken)?;

        let token = rest.split(' ').next().unwrap_or_default();
        if token.is_empty() || !constant_time_str_eq(token, &self.secret) {
            return Err(AuthError::InvalidToken);
        }

        Ok(())
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> BearerAuth {
        BearerAuth::new("abc123")
    }

    #[test]
    fn test_valid_token() {
        assert_eq!(gate().check(Some("Bearer abc123")), Ok(()));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(gate().check(None), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_wrong_scheme_is_missing() {
        assert_eq!(gate().check(Some("Basic abc123")), Err(AuthError::MissingToken));
        assert_eq!(gate().check(Some("bearer abc123")), Err(AuthError::MissingToken));
        assert_eq!(gate().check(Some("Bearer")), Err(AuthError::MissingToken));
        assert_eq!(gate().check(Some("abc123")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_wrong_token_is_invalid() {
        assert_eq!(gate().check(Some("Bearer nope")), Err(AuthError::InvalidToken));
        assert_eq!(gate().check(Some("Bearer abc1234")), Err(AuthError::InvalidToken));
        assert_eq!(gate().check(Some("Bearer ")), Err(AuthError::InvalidToken));
        assert_eq!(gate().check(Some("Bearer  abc123")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_token_stops_at_space() {
        assert_eq!(gate().check(Some("Bearer abc123 trailing")), Ok(()));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", gate());
        assert!(!debug.contains("abc123"));
    }
}
