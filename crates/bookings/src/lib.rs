//! `staybook-bookings` — booking domain: stay ranges, conflict detection,
//! pricing, and the validator that gates every booking write.

pub mod booking;
pub mod stay;
pub mod store;
pub mod validator;

pub use booking::{Booking, BookingPatch};
pub use stay::{StayRange, parse_date};
pub use store::BookingStore;
pub use validator::{BookingError, BookingQuote, StayRequest, validate, validate_patch};
