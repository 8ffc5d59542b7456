//! In-memory stores.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use staybook_bookings::{Booking, BookingStore, StayRange};
use staybook_core::{BookingId, PropertyId, StoreError, UserId};
use staybook_listings::{Property, PropertyStore};

fn poisoned() -> StoreError {
    StoreError::unavailable("lock poisoned")
}

/// In-memory property store.
#[derive(Debug, Default)]
pub struct InMemoryPropertyStore {
    inner: RwLock<HashMap<PropertyId, Property>>,
}

impl InMemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertyStore for InMemoryPropertyStore {
    async fn insert(&self, property: Property) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(property.id, property);
        Ok(())
    }

    async fn get(&self, id: PropertyId) -> Result<Option<Property>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Property>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut listings: Vec<Property> =
            map.values().filter(|p| p.is_active).cloned().collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn update(&self, property: Property) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(&property.id) {
            return Ok(false);
        }
        map.insert(property.id, property);
        Ok(true)
    }

    async fn delete(&self, id: PropertyId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}

/// In-memory booking store.
///
/// The no-overlap invariant is enforced under the write lock: the overlap
/// re-check and the insert happen while the same guard is held, so two
/// concurrent writes for overlapping ranges cannot both commit.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    inner: RwLock<HashMap<BookingId, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn overlapping<'a>(
    map: &'a HashMap<BookingId, Booking>,
    property_id: PropertyId,
    stay: &StayRange,
    exclude: Option<BookingId>,
) -> Option<&'a Booking> {
    map.values().find(|b| {
        b.property_id == property_id && Some(b.id) != exclude && b.stay.overlaps(stay)
    })
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if overlapping(&map, booking.property_id, &booking.stay, None).is_some() {
            return Err(StoreError::conflict("overlapping booking exists"));
        }
        map.insert(booking.id, booking);
        Ok(())
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut bookings: Vec<Booking> =
            map.values().filter(|b| b.user_id == user_id).cloned().collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        stay: &StayRange,
        exclude: Option<BookingId>,
    ) -> Result<Option<Booking>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(overlapping(&map, property_id, stay, exclude).cloned())
    }

    async fn update(&self, booking: Booking) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(&booking.id) {
            return Ok(false);
        }
        if overlapping(&map, booking.property_id, &booking.stay, Some(booking.id)).is_some() {
            return Err(StoreError::conflict("overlapping booking exists"));
        }
        map.insert(booking.id, booking);
        Ok(true)
    }

    async fn delete(&self, id: BookingId) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}
