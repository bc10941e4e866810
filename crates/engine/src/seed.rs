//! Initial stock providers.

use chrono::{DateTime, Utc};

use vending_inventory::{Beverage, Product};

/// Supplies the stock an engine starts with, one list per group.
///
/// The engine does not care where the data comes from; lists are merged and
/// validated when the catalog is built.
pub trait StockSource {
    fn prepare_stock(&self) -> Vec<Vec<Beverage>>;
}

/// The full product line-up, `units_per_product` units each, all made at the
/// same moment.
#[derive(Debug, Clone)]
pub struct DefaultStock {
    units_per_product: usize,
    manufactured_at: DateTime<Utc>,
}

impl DefaultStock {
    pub fn new(units_per_product: usize, manufactured_at: DateTime<Utc>) -> Self {
        Self {
            units_per_product,
            manufactured_at,
        }
    }
}

impl StockSource for DefaultStock {
    fn prepare_stock(&self) -> Vec<Vec<Beverage>> {
        Product::ALL
            .iter()
            .map(|product| product.batch(self.units_per_product, self.manufactured_at))
            .collect()
    }
}

/// Hand-built stock (tests, fixtures).
#[derive(Debug, Clone, Default)]
pub struct FixedStock(Vec<Vec<Beverage>>);

impl FixedStock {
    pub fn new(lists: Vec<Vec<Beverage>>) -> Self {
        Self(lists)
    }
}

impl StockSource for FixedStock {
    fn prepare_stock(&self) -> Vec<Vec<Beverage>> {
        self.0.clone()
    }
}
