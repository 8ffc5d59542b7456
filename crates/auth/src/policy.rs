//! Ownership/visibility policy checks.
//!
//! Handlers call these before touching a resource; the booking validator
//! itself never does authorization. Pure policy checks: no IO, no panics.

use thiserror::Error;

use staybook_core::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Listing writes (update/delete) are owner-only.
pub fn ensure_property_owner(owner: UserId, actor: UserId) -> Result<(), AccessError> {
    if owner == actor {
        Ok(())
    } else {
        Err(AccessError::Forbidden("only the property owner may do this".into()))
    }
}

/// Rescheduling a booking is for the guest who made it.
pub fn ensure_booking_guest(guest: UserId, actor: UserId) -> Result<(), AccessError> {
    if guest == actor {
        Ok(())
    } else {
        Err(AccessError::Forbidden("only the guest may change this booking".into()))
    }
}

/// A booking is visible to the guest who made it and to the owner of the
/// booked property.
pub fn ensure_booking_party(
    guest: UserId,
    property_owner: UserId,
    actor: UserId,
) -> Result<(), AccessError> {
    if actor == guest || actor == property_owner {
        Ok(())
    } else {
        Err(AccessError::Forbidden(
            "only the guest or the property owner may do this".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_may_modify_listing() {
        let owner = UserId::new();
        assert!(ensure_property_owner(owner, owner).is_ok());
    }

    #[test]
    fn non_owner_may_not_modify_listing() {
        let err = ensure_property_owner(UserId::new(), UserId::new()).unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(_)));
    }

    #[test]
    fn only_the_guest_may_reschedule() {
        let guest = UserId::new();
        assert!(ensure_booking_guest(guest, guest).is_ok());
        assert!(ensure_booking_guest(guest, UserId::new()).is_err());
    }

    #[test]
    fn guest_and_owner_may_see_booking() {
        let guest = UserId::new();
        let owner = UserId::new();
        assert!(ensure_booking_party(guest, owner, guest).is_ok());
        assert!(ensure_booking_party(guest, owner, owner).is_ok());
    }

    #[test]
    fn third_party_may_not_see_booking() {
        let err = ensure_booking_party(UserId::new(), UserId::new(), UserId::new()).unwrap_err();
        assert!(matches!(err, AccessError::Forbidden(_)));
    }
}
