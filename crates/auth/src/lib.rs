//! `staybook-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: claims
//! validation and policy checks are pure, credential verification sits behind
//! the [`IdentityProvider`] port.

pub mod claims;
pub mod identity;
pub mod jwt;
pub mod policy;

pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use identity::{IdentityError, IdentityProvider, InMemoryIdentityProvider};
pub use jwt::{Hs256Sessions, JwtValidator};
pub use policy::{AccessError, ensure_booking_guest, ensure_booking_party, ensure_property_owner};
