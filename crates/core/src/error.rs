//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the vending domain.
pub type VendingResult<T> = Result<T, VendingError>;

/// Domain-level error.
///
/// Every variant is recoverable and surfaced to the caller. Infrastructure
/// concerns (snapshot encoding, configuration) have their own error types in
/// the crates that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VendingError {
    /// An operation referenced a stock-group index (or a position inside a
    /// group) outside the current bounds.
    #[error("index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A purchase was attempted with a balance below the item's price.
    #[error("insufficient balance: price {price}, balance {balance}")]
    InsufficientBalance { price: Money, balance: Money },

    /// Stock maintenance was invoked against an empty catalog.
    #[error("out of stock")]
    OutOfStock,

    /// The expiration sweep found nothing past the shelf-life threshold.
    #[error("no expired stock")]
    NoExpiredStock,

    /// Restock was called with zero units.
    #[error("restock batch is empty")]
    EmptyRestockBatch,

    /// A value failed validation (e.g. zero capacity, mixed-kind batch).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A structural invariant was violated (e.g. corrupt restored state).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl VendingError {
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn insufficient_balance(price: Money, balance: Money) -> Self {
        Self::InsufficientBalance { price, balance }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
