use serde::Deserialize;

use staybook_bookings::Booking;
use staybook_listings::Property;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Minor units (e.g. cents). Negative values are rejected.
    pub price_per_night: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub price_per_night: Option<i64>,
    pub is_active: Option<bool>,
}

/// Dates stay strings here so malformed input maps to the validator's
/// invalid-date rejection instead of a framework-shaped decode error.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: String,
    pub check_in: String,
    pub check_out: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub property_id: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn property_to_json(p: &Property) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.to_string(),
        "owner_id": p.owner_id.to_string(),
        "title": p.title,
        "description": p.description,
        "location": p.location,
        "price_per_night": p.price_per_night.minor_units(),
        "is_active": p.is_active,
        "created_at": p.created_at.to_rfc3339(),
    })
}

pub fn booking_to_json(b: &Booking) -> serde_json::Value {
    serde_json::json!({
        "id": b.id.to_string(),
        "property_id": b.property_id.to_string(),
        "user_id": b.user_id.to_string(),
        "check_in": b.stay.check_in().to_string(),
        "check_out": b.stay.check_out().to_string(),
        "nights": b.stay.nights(),
        "total_price": b.total_price.minor_units(),
        "created_at": b.created_at.to_rfc3339(),
    })
}
