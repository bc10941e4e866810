//! Inventory & transaction engine (application-level orchestration).
//!
//! `InventoryEngine` owns the stock catalog, the cash ledger and the purchase
//! history, and is the only thing that mutates them. Every public operation
//! either completes or fails before touching state:
//!
//! ```text
//! purchase(index, available)
//!   ↓
//! 1. index < group count             → IndexOutOfRange
//!   ↓
//! 2. price ≤ available and ≤ ledger  → InsufficientBalance
//!   ↓
//! 3. catalog.take_first → ledger.deduct → history.record
//!   ↓
//! 4. publish StockChanged (best-effort)
//! ```
//!
//! The engine is single-owner and synchronous. To share it between threads,
//! wrap it in [`crate::SharedEngine`], which turns every operation into a
//! critical section.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use vending_accounting::{CashLedger, CashUnit};
use vending_core::{Money, VendingError, VendingResult};
use vending_events::{EventBus, InMemoryEventBus, StockChangeCause, StockChanged, Subscription};
use vending_inventory::{Beverage, BeverageKind, ExpiredSet, ShelfLife, StockCatalog, StockGroup};
use vending_sales::PurchaseHistory;

use crate::config::EngineConfig;
use crate::seed::StockSource;
use crate::snapshot::{EngineSnapshot, SnapshotError};

/// Default bus: in-process fan-out of stock notifications.
pub type StockBus = InMemoryEventBus<StockChanged>;

pub struct InventoryEngine<B = StockBus>
where
    B: EventBus<StockChanged>,
{
    catalog: StockCatalog,
    ledger: CashLedger,
    history: PurchaseHistory,
    status: String,
    shelf_life: ShelfLife,
    revision: u64,
    bus: B,
}

impl InventoryEngine<StockBus> {
    /// Engine seeded from `source`, with its own in-memory notification bus.
    pub fn seeded(source: &impl StockSource, config: &EngineConfig) -> VendingResult<Self> {
        Self::new(source, StockBus::new(), config)
    }
}

impl<B> InventoryEngine<B>
where
    B: EventBus<StockChanged>,
{
    pub fn new(source: &impl StockSource, bus: B, config: &EngineConfig) -> VendingResult<Self> {
        let catalog = StockCatalog::from_unit_lists(source.prepare_stock())?;
        tracing::info!(
            groups = catalog.len(),
            units = catalog.total_units(),
            "engine seeded"
        );

        Ok(Self {
            catalog,
            ledger: CashLedger::new(),
            history: PurchaseHistory::new(),
            status: String::new(),
            shelf_life: config.shelf_life,
            revision: 0,
            bus,
        })
    }

    /// Rebuilds an engine from a snapshot, re-establishing the catalog
    /// invariants (one group per kind, no empty groups, uniform groups).
    pub fn restore(snapshot: EngineSnapshot, bus: B, config: &EngineConfig) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        let catalog = StockCatalog::from_unit_lists(snapshot.stock)?;
        tracing::info!(
            groups = catalog.len(),
            balance = %snapshot.balance,
            purchases = snapshot.history.len(),
            "engine restored from snapshot"
        );

        Ok(Self {
            catalog,
            ledger: CashLedger::with_balance(snapshot.balance),
            history: PurchaseHistory::from_log(snapshot.history),
            status: snapshot.status,
            shelf_life: config.shelf_life,
            revision: 0,
            bus,
        })
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(
            self.catalog.groups().iter().map(StockGroup::to_vec).collect(),
            self.ledger.balance(),
            self.history.all().to_vec(),
            self.status.clone(),
        )
    }

    pub fn subscribe(&self) -> Subscription<StockChanged> {
        self.bus.subscribe()
    }

    pub fn deposit(&mut self, amount: Money) {
        self.ledger.add_balance(amount);
        tracing::debug!(%amount, balance = %self.ledger.balance(), "cash deposited");
    }

    pub fn insert_cash(&mut self, unit: CashUnit) {
        self.deposit(unit.value());
    }

    /// Sells the oldest unit of the group at `group_index`.
    ///
    /// `available_balance` is what the caller is willing to spend. The ledger
    /// must also cover the price, so a successful purchase never over-draws.
    pub fn purchase(&mut self, group_index: usize, available_balance: Money) -> VendingResult<Beverage> {
        let price = self.catalog.peek_first(group_index)?.price();

        let balance = self.ledger.balance();
        if price > available_balance || price > balance {
            tracing::debug!(group_index, %price, %available_balance, %balance, "purchase refused");
            return Err(VendingError::insufficient_balance(price, available_balance.min(balance)));
        }

        let unit = self.catalog.take_first(group_index)?;
        self.ledger.deduct(price)?;
        self.history.record(unit.clone());

        tracing::info!(
            kind = %unit.kind(),
            %price,
            balance = %self.ledger.balance(),
            "beverage sold"
        );
        self.notify(StockChangeCause::Purchase);

        Ok(unit)
    }

    /// [`Self::purchase`] spending from the ledger's current balance.
    pub fn purchase_with_balance(&mut self, group_index: usize) -> VendingResult<Beverage> {
        let balance = self.ledger.balance();
        self.purchase(group_index, balance)
    }

    /// Adds a same-kind batch; returns the full contents of the merged group.
    pub fn restock(&mut self, units: Vec<Beverage>) -> VendingResult<Vec<Beverage>> {
        let added = units.len();
        let group = self.catalog.add_units(units)?;
        let merged = group.to_vec();

        tracing::info!(kind = %group.kind(), added, in_stock = merged.len(), "stock replenished");
        self.notify(StockChangeCause::Restock);

        Ok(merged)
    }

    /// Units past their shelf life at `as_of`, per group. Does not mutate.
    pub fn expired_stock(&self, as_of: DateTime<Utc>) -> VendingResult<Vec<ExpiredSet>> {
        self.catalog.sweep_expired(as_of, self.shelf_life)
    }

    /// Sweeps and removes every expired unit; returns what was removed.
    pub fn run_expiration_maintenance(&mut self, as_of: DateTime<Utc>) -> VendingResult<Vec<Beverage>> {
        let expired = self.catalog.sweep_expired(as_of, self.shelf_life)?;
        let removed = self.catalog.remove_expired(&expired)?;

        tracing::info!(
            removed = removed.len(),
            groups_left = self.catalog.len(),
            %as_of,
            "expired stock removed"
        );
        if !removed.is_empty() {
            self.notify(StockChangeCause::ExpiredRemoval);
        }

        Ok(removed)
    }

    pub fn stock_list(&self) -> &[StockGroup] {
        self.catalog.groups()
    }

    /// Units per group, in catalog order.
    pub fn stock_counts(&self) -> Vec<(BeverageKind, usize)> {
        self.catalog
            .groups()
            .iter()
            .map(|g| (g.kind(), g.len()))
            .collect()
    }

    pub fn balance(&self) -> Money {
        self.ledger.balance()
    }

    pub fn history(&self) -> &[Beverage] {
        self.history.all()
    }

    pub fn history_grouped(&self) -> HashMap<BeverageKind, usize> {
        self.history.grouped_counts()
    }

    pub fn revenue(&self) -> Money {
        self.history.revenue()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn shelf_life(&self) -> ShelfLife {
        self.shelf_life
    }

    /// Number of stock notifications emitted by this engine instance.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self, cause: StockChangeCause) {
        self.revision += 1;
        if let Err(err) = self.bus.publish(StockChanged::new(self.revision, cause)) {
            tracing::warn!(?err, revision = self.revision, "stock notification not delivered");
        }
    }
}

impl<B> core::fmt::Debug for InventoryEngine<B>
where
    B: EventBus<StockChanged>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryEngine")
            .field("groups", &self.catalog.len())
            .field("units", &self.catalog.total_units())
            .field("balance", &self.ledger.balance())
            .field("purchases", &self.history.len())
            .field("revision", &self.revision)
            .finish()
    }
}
