//! Monetary amounts as integer cents.
//!
//! The billing tables store whole cents; float arithmetic never touches
//! money in this codebase.

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A monetary amount in whole cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    ToSchema,
)]
#[serde(transparent)]
pub struct AmountCents(i64);

impl AmountCents {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw cent value.
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// The raw cent value.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is below zero. Amounts due and paid must not be.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for AmountCents {
    type Output = Self;

    /// Saturates at the `i64` bounds rather than wrapping. Real schedule
    /// totals sit many orders of magnitude below the limit, and a clamped
    /// total is preferable to a panicking or wrapped one in a sum over
    /// caller-supplied amounts.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for AmountCents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn sums_across_an_iterator() {
        let total: AmountCents = [500_00, 500_00, 500_00]
            .into_iter()
            .map(AmountCents::new)
            .sum();
        assert_eq!(total, AmountCents::new(1500_00));
    }

    #[rstest]
    fn add_saturates_instead_of_wrapping() {
        let total = AmountCents::new(i64::MAX) + AmountCents::new(1);
        assert_eq!(total, AmountCents::new(i64::MAX));

        let floor = AmountCents::new(i64::MIN) + AmountCents::new(-1);
        assert_eq!(floor, AmountCents::new(i64::MIN));
    }

    #[rstest]
    #[case(-1, true)]
    #[case(0, false)]
    #[case(1, false)]
    fn flags_negative_amounts(#[case] cents: i64, #[case] negative: bool) {
        assert_eq!(AmountCents::new(cents).is_negative(), negative);
    }
}
