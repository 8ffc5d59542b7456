//! Identity provider boundary (register/login).
//!
//! Credential storage and verification are delegated behind this port; the
//! rest of the system only ever sees a [`UserId`]. The in-memory
//! implementation is intended for dev/tests, standing in for a hosted
//! provider.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use staybook_core::UserId;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Email + password identity boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Returns the new user's id.
    async fn register(&self, email: &str, password: &str) -> Result<UserId, IdentityError>;

    /// Verify credentials. Returns the account's user id.
    async fn login(&self, email: &str, password: &str) -> Result<UserId, IdentityError>;
}

/// Normalize an email for use as a lookup key.
///
/// Deliberately lax: trim, lowercase, and require a local part and a domain.
/// Real deliverability checks belong to the hosted provider.
fn normalize_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(IdentityError::InvalidEmail),
    }
}

struct CredentialRecord {
    user_id: UserId,
    salt: [u8; 16],
    password_hash: [u8; 32],
}

fn hash_password(salt: &[u8; 16], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// In-memory credential store (dev/tests only).
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn register(&self, email: &str, password: &str) -> Result<UserId, IdentityError> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword);
        }

        let mut salt = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        let record = CredentialRecord {
            user_id: UserId::new(),
            password_hash: hash_password(&salt, password),
            salt,
        };

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| IdentityError::Unavailable("lock poisoned".into()))?;
        if accounts.contains_key(&email) {
            return Err(IdentityError::EmailTaken);
        }
        let user_id = record.user_id;
        accounts.insert(email, record);
        Ok(user_id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserId, IdentityError> {
        let email = normalize_email(email).map_err(|_| IdentityError::InvalidCredentials)?;

        let accounts = self
            .accounts
            .read()
            .map_err(|_| IdentityError::Unavailable("lock poisoned".into()))?;
        let record = accounts.get(&email).ok_or(IdentityError::InvalidCredentials)?;

        if hash_password(&record.salt, password) != record.password_hash {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(record.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_login_returns_same_user() {
        let provider = InMemoryIdentityProvider::new();
        let id = provider.register("guest@example.com", "hunter22").await.unwrap();
        let logged_in = provider.login("guest@example.com", "hunter22").await.unwrap();
        assert_eq!(id, logged_in);
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let provider = InMemoryIdentityProvider::new();
        provider.register("Guest@Example.COM", "hunter22").await.unwrap();
        assert!(provider.login(" guest@example.com ", "hunter22").await.is_ok());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider.register("guest@example.com", "hunter22").await.unwrap();
        let err = provider.register("guest@example.com", "other-pass").await.unwrap_err();
        assert_eq!(err, IdentityError::EmailTaken);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider.register("guest@example.com", "hunter22").await.unwrap();
        let err = provider.login("guest@example.com", "wrong").await.unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials_not_not_found() {
        let provider = InMemoryIdentityProvider::new();
        let err = provider.login("nobody@example.com", "whatever").await.unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }

    #[tokio::test]
    async fn malformed_email_and_short_password_are_rejected() {
        let provider = InMemoryIdentityProvider::new();
        assert_eq!(
            provider.register("no-at-sign", "hunter22").await.unwrap_err(),
            IdentityError::InvalidEmail
        );
        assert_eq!(
            provider.register("guest@example.com", "short").await.unwrap_err(),
            IdentityError::WeakPassword
        );
    }
}
