//! Booking validator: decides whether a proposed stay is chronologically
//! valid and conflict-free, and prices it.
//!
//! This is a stateless decision procedure. It only issues read queries
//! (property lookup, conflict lookup) and returns a [`BookingQuote`]; the
//! caller owns the actual insert/update.

use chrono::NaiveDate;
use thiserror::Error;

use staybook_core::{BookingId, Money, PropertyId, StoreError};
use staybook_listings::PropertyStore;

use crate::booking::{Booking, BookingPatch};
use crate::stay::StayRange;
use crate::store::BookingStore;

/// Why a proposed stay was rejected. Every kind is terminal for the request;
/// the API layer owns the HTTP status mapping.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid dates (check_in < check_out required)")]
    InvalidDateRange,

    #[error("property not found")]
    PropertyNotFound,

    #[error("requested dates conflict with an existing booking")]
    DateConflict,

    #[error("booking not found")]
    BookingNotFound,

    #[error("total price exceeds the representable range")]
    PriceOverflow,

    #[error("dependency failure: {0}")]
    Dependency(#[from] StoreError),
}

/// A proposed stay, as received from a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRequest {
    pub property_id: PropertyId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// A validated, priced stay, ready for the caller to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuote {
    pub property_id: PropertyId,
    pub stay: StayRange,
    pub nights: u32,
    pub total_price: Money,
}

/// Validate and price a proposed stay.
///
/// Preconditions are checked in order: date range, property existence,
/// overlap against existing bookings (minus `exclude`). The total is
/// `nights * price_per_night` in exact integer minor units.
pub async fn validate(
    properties: &dyn PropertyStore,
    bookings: &dyn BookingStore,
    request: StayRequest,
    exclude: Option<BookingId>,
) -> Result<BookingQuote, BookingError> {
    let stay = StayRange::new(request.check_in, request.check_out)
        .map_err(|_| BookingError::InvalidDateRange)?;

    let property = properties
        .get(request.property_id)
        .await?
        .ok_or(BookingError::PropertyNotFound)?;

    if bookings
        .find_overlapping(request.property_id, &stay, exclude)
        .await?
        .is_some()
    {
        return Err(BookingError::DateConflict);
    }

    let nights = stay.nights();
    let total_price = property
        .price_per_night
        .checked_mul_nights(nights)
        .ok_or(BookingError::PriceOverflow)?;

    Ok(BookingQuote {
        property_id: request.property_id,
        stay,
        nights,
        total_price,
    })
}

/// Update variant: merge a partial patch over the stored booking so the full
/// post-update range is always validated, not just the changed fields. The
/// booking's own id is excluded from the conflict check.
///
/// Returns the current persisted booking together with the new quote.
pub async fn validate_patch(
    properties: &dyn PropertyStore,
    bookings: &dyn BookingStore,
    booking_id: BookingId,
    patch: BookingPatch,
) -> Result<(Booking, BookingQuote), BookingError> {
    let current = bookings
        .get(booking_id)
        .await?
        .ok_or(BookingError::BookingNotFound)?;

    let request = StayRequest {
        property_id: patch.property_id.unwrap_or(current.property_id),
        check_in: patch.check_in.unwrap_or_else(|| current.stay.check_in()),
        check_out: patch.check_out.unwrap_or_else(|| current.stay.check_out()),
    };

    let quote = validate(properties, bookings, request, Some(booking_id)).await?;
    Ok((current, quote))
}
