//! Half-open stay intervals.
//!
//! A stay occupies `[check_in, check_out)`: the checkout day is not occupied,
//! so a checkout on day X never conflicts with a check-in on day X.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use staybook_core::{DomainError, DomainResult};

/// A validated stay interval. Construction guarantees `check_in < check_out`,
/// so every value has at least one night.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StayRangeWire", into = "StayRangeWire")]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
struct StayRangeWire {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl TryFrom<StayRangeWire> for StayRange {
    type Error = DomainError;

    fn try_from(wire: StayRangeWire) -> Result<Self, Self::Error> {
        Self::new(wire.check_in, wire.check_out)
    }
}

impl From<StayRange> for StayRangeWire {
    fn from(stay: StayRange) -> Self {
        Self {
            check_in: stay.check_in,
            check_out: stay.check_out,
        }
    }
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::validation(
                "invalid dates (check_in < check_out required)",
            ));
        }
        Ok(Self { check_in, check_out })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Whole nights in the stay; at least 1 by construction.
    pub fn nights(&self) -> u32 {
        // NaiveDate's full range stays well inside u32 days.
        (self.check_out - self.check_in)
            .num_days()
            .try_into()
            .unwrap_or(u32::MAX)
    }

    /// Half-open interval overlap: `[a_in, a_out)` and `[b_in, b_out)`
    /// overlap iff `a_in < b_out && b_in < a_out`.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DomainError::validation(format!("invalid date: {s:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> StayRange {
        StayRange::new(date(check_in), date(check_out)).unwrap()
    }

    #[test]
    fn zero_and_negative_night_stays_are_rejected() {
        assert!(StayRange::new(date("2024-01-05"), date("2024-01-05")).is_err());
        assert!(StayRange::new(date("2024-01-06"), date("2024-01-05")).is_err());
    }

    #[test]
    fn nights_counts_whole_days() {
        assert_eq!(stay("2024-03-01", "2024-03-04").nights(), 3);
        assert_eq!(stay("2024-02-28", "2024-03-01").nights(), 2); // leap year
    }

    #[test]
    fn shared_boundary_does_not_overlap() {
        let a = stay("2024-01-01", "2024-01-05");
        let b = stay("2024-01-05", "2024-01-10");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn straddling_ranges_overlap() {
        let a = stay("2024-01-01", "2024-01-05");
        let b = stay("2024-01-04", "2024-01-10");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn contained_range_overlaps() {
        let outer = stay("2024-01-01", "2024-01-31");
        let inner = stay("2024-01-10", "2024-01-12");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn malformed_dates_fail_to_parse() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn serde_rejects_inverted_ranges() {
        let err = serde_json::from_str::<StayRange>(
            r#"{"check_in":"2024-01-10","check_out":"2024-01-05"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("check_in"));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric_and_matches_the_inequality(
            a_in in 0i64..600, a_len in 1i64..60, b_in in 0i64..600, b_len in 1i64..60,
        ) {
            let base = date("2024-01-01");
            let a = StayRange::new(base + chrono::Days::new(a_in as u64),
                                   base + chrono::Days::new((a_in + a_len) as u64)).unwrap();
            let b = StayRange::new(base + chrono::Days::new(b_in as u64),
                                   base + chrono::Days::new((b_in + b_len) as u64)).unwrap();

            let expected = a_in < b_in + b_len && b_in < a_in + a_len;
            prop_assert_eq!(a.overlaps(&b), expected);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
