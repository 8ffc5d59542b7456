use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use staybook_core::{BookingId, Money, PropertyId, UserId};

use crate::stay::StayRange;

/// A confirmed booking of one property by one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub property_id: PropertyId,
    pub user_id: UserId,
    pub stay: StayRange,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a booking. `None` means "keep the persisted value";
/// the validator merges these over the stored booking before re-checking the
/// full post-update range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    pub property_id: Option<PropertyId>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
}
