//! `vending-engine` — the inventory & transaction engine.
//!
//! Composes the stock catalog, cash ledger and purchase history behind one
//! owner, publishes stock-change notifications, and snapshots/restores the
//! whole state.

pub mod config;
pub mod engine;
pub mod seed;
pub mod shared;
pub mod snapshot;

pub use config::EngineConfig;
pub use engine::{InventoryEngine, StockBus};
pub use seed::{DefaultStock, FixedStock, StockSource};
pub use shared::SharedEngine;
pub use snapshot::{EngineSnapshot, SnapshotError, SNAPSHOT_VERSION};
