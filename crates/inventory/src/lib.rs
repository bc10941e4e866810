//! Inventory domain module.
//!
//! Beverages, the fixed product line-up, and the grouped stock catalog with
//! its expiration sweep. Deterministic domain logic only (no IO, no clock).

pub mod beverage;
pub mod catalog;
pub mod product;

pub use beverage::{Beverage, BeverageKind, BeverageRecord, ShelfLife, LARGE_CAPACITY_ML};
pub use catalog::{ExpiredSet, StockCatalog, StockGroup};
pub use product::Product;
