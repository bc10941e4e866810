use serde::{Deserialize, Serialize};

use vending_core::{Money, VendingError, VendingResult};

/// Banknotes the machine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashUnit {
    Thousand,
    FiveThousand,
}

impl CashUnit {
    pub fn value(self) -> Money {
        match self {
            CashUnit::Thousand => Money::new(1_000),
            CashUnit::FiveThousand => Money::new(5_000),
        }
    }
}

/// Running cash balance of the machine.
///
/// A plain accumulator: the engine checks affordability before it deducts.
/// `deduct` still refuses an over-draw instead of wrapping, because the
/// balance type cannot go below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashLedger {
    balance: Money,
}

impl CashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: Money) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn add_balance(&mut self, amount: Money) {
        self.balance = self.balance + amount;
    }

    pub fn deposit(&mut self, unit: CashUnit) {
        self.add_balance(unit.value());
    }

    pub fn deduct(&mut self, amount: Money) -> VendingResult<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| VendingError::insufficient_balance(amount, self.balance))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn deposits_accumulate() {
        let mut ledger = CashLedger::new();
        ledger.deposit(CashUnit::Thousand);
        ledger.deposit(CashUnit::FiveThousand);
        ledger.add_balance(Money::new(500));
        assert_eq!(ledger.balance(), Money::new(6_500));
    }

    #[test]
    fn deduct_down_to_zero() {
        let mut ledger = CashLedger::with_balance(Money::new(1_500));
        ledger.deduct(Money::new(1_500)).unwrap();
        assert!(ledger.balance().is_zero());
    }

    #[test]
    fn overdraw_is_refused_and_balance_kept() {
        let mut ledger = CashLedger::with_balance(Money::new(1_000));
        let err = ledger.deduct(Money::new(1_200)).unwrap_err();
        assert_eq!(
            err,
            VendingError::insufficient_balance(Money::new(1_200), Money::new(1_000))
        );
        assert_eq!(ledger.balance(), Money::new(1_000));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any deposits and affordable deductions, the balance
        /// equals deposits minus deductions.
        #[test]
        fn balance_is_deposits_minus_deductions(
            ops in prop::collection::vec((any::<bool>(), 0u64..10_000u64), 0..40)
        ) {
            let mut ledger = CashLedger::new();
            let mut expected: u64 = 0;

            for (is_deposit, amount) in ops {
                if is_deposit {
                    ledger.add_balance(Money::new(amount));
                    expected += amount;
                } else if amount <= expected {
                    ledger.deduct(Money::new(amount)).unwrap();
                    expected -= amount;
                } else {
                    prop_assert!(ledger.deduct(Money::new(amount)).is_err());
                }
            }

            prop_assert_eq!(ledger.balance().amount(), expected);
        }
    }
}
