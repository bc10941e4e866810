//! `vending-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod money;
pub mod value_object;

pub use error::{VendingError, VendingResult};
pub use money::Money;
pub use value_object::ValueObject;
