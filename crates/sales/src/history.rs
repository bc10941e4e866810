use std::collections::HashMap;

use vending_core::Money;
use vending_inventory::{Beverage, BeverageKind};

/// Append-only log of sold units, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PurchaseHistory {
    log: Vec<Beverage>,
}

impl PurchaseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a history from a previously recorded log.
    pub fn from_log(log: Vec<Beverage>) -> Self {
        Self { log }
    }

    pub fn record(&mut self, unit: Beverage) {
        self.log.push(unit);
    }

    pub fn all(&self) -> &[Beverage] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Purchases per kind, computed from the log on demand.
    pub fn grouped_counts(&self) -> HashMap<BeverageKind, usize> {
        let mut counts = HashMap::new();
        for unit in &self.log {
            *counts.entry(unit.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn revenue(&self) -> Money {
        self.log.iter().map(Beverage::price).sum()
    }
}
