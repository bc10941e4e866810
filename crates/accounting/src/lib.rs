//! Cash handling for the machine.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod ledger;

pub use ledger::{CashLedger, CashUnit};
