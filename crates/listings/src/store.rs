//! Property store port.

use async_trait::async_trait;

use staybook_core::{PropertyId, StoreError};

use crate::property::Property;

/// Persistence boundary for listings. No storage assumptions; implementations
/// live in `staybook-infra` (in-memory for dev/tests, Postgres for prod).
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn insert(&self, property: Property) -> Result<(), StoreError>;

    async fn get(&self, id: PropertyId) -> Result<Option<Property>, StoreError>;

    /// Active listings, newest first.
    async fn list_active(&self) -> Result<Vec<Property>, StoreError>;

    /// Replace the stored record. Returns `false` if the id is unknown.
    async fn update(&self, property: Property) -> Result<bool, StoreError>;

    /// Returns `false` if the id is unknown.
    async fn delete(&self, id: PropertyId) -> Result<bool, StoreError>;
}
