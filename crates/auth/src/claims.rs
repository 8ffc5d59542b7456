//! Session claims model (transport-agnostic).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staybook_core::UserId;

/// Claims carried by a session token once it has been decoded and its
/// signature verified by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / authenticated user.
    pub sub: UserId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate session claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// happens in [`crate::jwt`].
pub fn validate_claims(
    claims: &SessionClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_offset_min: i64, expires_offset_min: i64) -> (SessionClaims, DateTime<Utc>) {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: UserId::new(),
            issued_at: now + Duration::minutes(issued_offset_min),
            expires_at: now + Duration::minutes(expires_offset_min),
        };
        (claims, now)
    }

    #[test]
    fn current_token_is_valid() {
        let (claims, now) = claims(-5, 5);
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let (claims, now) = claims(-10, -1);
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::Expired));
    }

    #[test]
    fn future_token_is_rejected() {
        let (claims, now) = claims(1, 10);
        assert_eq!(validate_claims(&claims, now), Err(TokenValidationError::NotYetValid));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (claims, now) = claims(5, -5);
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
