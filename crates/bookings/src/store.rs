//! Booking store port.

use async_trait::async_trait;

use staybook_core::{BookingId, PropertyId, StoreError, UserId};

use crate::booking::Booking;
use crate::stay::StayRange;

/// Persistence boundary for bookings.
///
/// The validator's check-then-act sequence cannot close the double-booking
/// race on its own, so the invariant is owned here: `insert` and `update`
/// MUST re-verify the no-overlap invariant under the store's own
/// serialization (a write lock, a range-exclusion constraint, ...) and fail
/// with [`StoreError::Conflict`] when a concurrent conflicting write won.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a new booking. `Conflict` if its stay overlaps an existing
    /// booking for the same property.
    async fn insert(&self, booking: Booking) -> Result<(), StoreError>;

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// The guest's bookings, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, StoreError>;

    /// First booking on `property_id` whose stay overlaps `stay`, skipping
    /// `exclude` (a booking being updated keeps its own slot).
    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        stay: &StayRange,
        exclude: Option<BookingId>,
    ) -> Result<Option<Booking>, StoreError>;

    /// Replace the stored record; same overlap contract as `insert`, with the
    /// booking's own id excluded. Returns `false` if the id is unknown.
    async fn update(&self, booking: Booking) -> Result<bool, StoreError>;

    /// Returns `false` if the id is unknown.
    async fn delete(&self, id: BookingId) -> Result<bool, StoreError>;
}
