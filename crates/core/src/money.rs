//! Cash amounts in the smallest currency unit.

use core::iter::Sum;
use core::ops::Add;

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A non-negative amount of cash, in the smallest currency unit (won).
///
/// Negative amounts are unrepresentable; subtraction goes through
/// [`Money::checked_sub`] so callers decide what an over-draw means.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` when `rhs` exceeds `self`.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Saturates at `u64::MAX`.
    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl ValueObject for Money {}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        self.saturating_add(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Self(value)
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
    fn checked_sub_refuses_overdraw() {
        assert_eq!(Money::new(500).checked_sub(Money::new(200)), Some(Money::new(300)));
        assert_eq!(Money::new(200).checked_sub(Money::new(500)), None);
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::new(1200)).unwrap();
        assert_eq!(json, "1200");
    }

    proptest! {
        #[test]
        fn sum_matches_integer_sum(amounts in prop::collection::vec(0u64..100_000u64, 0..20)) {
            let total: Money = amounts.iter().copied().map(Money::new).sum();
            prop_assert_eq!(total.amount(), amounts.iter().sum::<u64>());
        }
    }
}
