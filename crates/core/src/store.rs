//! Store boundary failure taxonomy.
//!
//! Ports to persistent storage live in the domain crates next to the types
//! they serve; this is the shared failure type those ports return. It stays
//! deliberately small: callers only branch on "dependency down", "bad data",
//! or "write lost to a concurrent conflicting write".

use thiserror::Error;

/// Failure of a store operation, as seen across a store port.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A persisted record could not be decoded into its domain type.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// A write was rejected because it conflicts with concurrent state
    /// (e.g. an overlapping booking committed first).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
