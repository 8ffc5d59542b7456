//! Monetary amounts in integer minor units.
//!
//! All prices in the system are whole minor units (e.g. cents, öre). Nightly
//! pricing is linear, so totals stay exact under integer multiplication; there
//! is no rounding step anywhere.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A non-negative amount of money in minor units.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Parse a client-supplied amount, rejecting negative values.
    pub fn try_from_minor_signed(minor: i64) -> DomainResult<Self> {
        u64::try_from(minor)
            .map(Self)
            .map_err(|_| DomainError::validation("amount must be non-negative"))
    }

    /// Multiply a per-night rate by a night count. `None` on overflow.
    pub fn checked_mul_nights(&self, nights: u32) -> Option<Money> {
        self.0.checked_mul(u64::from(nights)).map(Money)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn negative_amounts_are_rejected() {
        let err = Money::try_from_minor_signed(-1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(Money::try_from_minor_signed(0).unwrap(), Money::ZERO);
    }

    #[test]
    fn nightly_total_is_exact() {
        let rate = Money::from_minor(10_000);
        assert_eq!(rate.checked_mul_nights(3), Some(Money::from_minor(30_000)));
    }

    #[test]
    fn nightly_total_overflow_is_detected() {
        let rate = Money::from_minor(u64::MAX);
        assert_eq!(rate.checked_mul_nights(2), None);
    }

    proptest! {
        #[test]
        fn total_matches_widened_multiplication(rate in 0u64..=1u64 << 40, nights in 0u32..=4000) {
            let total = Money::from_minor(rate).checked_mul_nights(nights);
            let expected = u128::from(rate) * u128::from(nights);
            match total {
                Some(t) => prop_assert_eq!(u128::from(t.minor_units()), expected),
                None => prop_assert!(expected > u128::from(u64::MAX)),
            }
        }
    }
}
