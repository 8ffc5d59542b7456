//! HS256 session tokens.
//!
//! Tokens carry numeric `iat`/`exp` on the wire; the time-window check is done
//! by [`validate_claims`] rather than the JWT library so that validation is
//! deterministic against an injected clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use staybook_core::UserId;

use crate::claims::{SessionClaims, TokenValidationError, validate_claims};

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>)
    -> Result<SessionClaims, TokenValidationError>;
}

/// On-the-wire claim layout (seconds since epoch, per RFC 7519).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// HS256 signer/validator holding the shared session secret.
pub struct Hs256Sessions {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Sessions {
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a session token for `user_id`, valid from `now` for the
    /// configured ttl.
    pub fn issue(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<(String, SessionClaims), TokenValidationError> {
        let claims = SessionClaims {
            sub: user_id,
            issued_at: now,
            expires_at: now + self.ttl,
        };
        let wire = WireClaims {
            sub: *user_id.as_uuid(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        Ok((token, claims))
    }
}

impl JwtValidator for Hs256Sessions {
    fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenValidationError> {
        // Signature check only; the time window is ours.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let wire = decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?
            .claims;

        let issued_at = DateTime::<Utc>::from_timestamp(wire.iat, 0)
            .ok_or_else(|| TokenValidationError::Malformed("iat out of range".into()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(wire.exp, 0)
            .ok_or_else(|| TokenValidationError::Malformed("exp out of range".into()))?;

        let claims = SessionClaims {
            sub: UserId::from_uuid(wire.sub),
            issued_at,
            expires_at,
        };
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}
