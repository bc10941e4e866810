use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vending_core::{Money, VendingError};

/// Capacity (ml) from which a beverage counts as large.
pub const LARGE_CAPACITY_ML: u32 = 300;

/// Kind discriminator: the grouping and equality key for beverages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeverageKind {
    StrawberryMilk,
    ChocolateMilk,
    BananaMilk,
    Coke,
    Cider,
    Fanta,
    TopCoffee,
    CantataCoffee,
    GeorgiaCoffee,
}

impl BeverageKind {
    pub const ALL: [BeverageKind; 9] = [
        BeverageKind::StrawberryMilk,
        BeverageKind::ChocolateMilk,
        BeverageKind::BananaMilk,
        BeverageKind::Coke,
        BeverageKind::Cider,
        BeverageKind::Fanta,
        BeverageKind::TopCoffee,
        BeverageKind::CantataCoffee,
        BeverageKind::GeorgiaCoffee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BeverageKind::StrawberryMilk => "strawberry_milk",
            BeverageKind::ChocolateMilk => "chocolate_milk",
            BeverageKind::BananaMilk => "banana_milk",
            BeverageKind::Coke => "coke",
            BeverageKind::Cider => "cider",
            BeverageKind::Fanta => "fanta",
            BeverageKind::TopCoffee => "top_coffee",
            BeverageKind::CantataCoffee => "cantata_coffee",
            BeverageKind::GeorgiaCoffee => "georgia_coffee",
        }
    }
}

impl core::fmt::Display for BeverageKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated beverage attributes (construction input and wire shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeverageRecord {
    pub kind: BeverageKind,
    pub brand: String,
    pub capacity_ml: u32,
    pub price: Money,
    pub name: String,
    pub manufactured_at: DateTime<Utc>,
    pub manufacturer: String,
}

/// One physical unit of a beverage.
///
/// Immutable once built. Equality and hashing look at [`BeverageKind`] only:
/// two cans of the same kind compare equal whatever their manufacture date.
/// Compare [`Beverage::record`] when per-unit attributes matter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BeverageRecord")]
pub struct Beverage {
    kind: BeverageKind,
    brand: String,
    capacity_ml: u32,
    price: Money,
    name: String,
    manufactured_at: DateTime<Utc>,
    manufacturer: String,
}

impl Beverage {
    /// Builds a unit from trusted constants (the product catalogue).
    pub(crate) fn assemble(record: BeverageRecord) -> Self {
        Self {
            kind: record.kind,
            brand: record.brand,
            capacity_ml: record.capacity_ml,
            price: record.price,
            name: record.name,
            manufactured_at: record.manufactured_at,
            manufacturer: record.manufacturer,
        }
    }

    pub fn kind(&self) -> BeverageKind {
        self.kind
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn capacity_ml(&self) -> u32 {
        self.capacity_ml
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufactured_at(&self) -> DateTime<Utc> {
        self.manufactured_at
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn record(&self) -> BeverageRecord {
        BeverageRecord {
            kind: self.kind,
            brand: self.brand.clone(),
            capacity_ml: self.capacity_ml,
            price: self.price,
            name: self.name.clone(),
            manufactured_at: self.manufactured_at,
            manufacturer: self.manufacturer.clone(),
        }
    }

    pub fn is_large_capacity(&self) -> bool {
        self.capacity_ml >= LARGE_CAPACITY_ML
    }

    pub fn is_affordable_with(&self, balance: Money) -> bool {
        balance >= self.price
    }

    /// Whole days elapsed since manufacture (truncated; negative if `as_of`
    /// precedes the manufacture date).
    pub fn age_in_days(&self, as_of: DateTime<Utc>) -> i64 {
        (as_of - self.manufactured_at).num_days()
    }

    /// Expired once the age reaches the shelf life (inclusive).
    pub fn is_expired(&self, as_of: DateTime<Utc>, shelf_life: ShelfLife) -> bool {
        self.age_in_days(as_of) >= i64::from(shelf_life.days())
    }
}

impl TryFrom<BeverageRecord> for Beverage {
    type Error = VendingError;

    fn try_from(record: BeverageRecord) -> Result<Self, Self::Error> {
        if record.capacity_ml == 0 {
            return Err(VendingError::validation("capacity must be positive"));
        }
        if record.name.trim().is_empty() {
            return Err(VendingError::validation("name cannot be empty"));
        }
        Ok(Self::assemble(record))
    }
}

impl PartialEq for Beverage {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Beverage {}

impl core::hash::Hash for Beverage {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl core::fmt::Display for Beverage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.name, self.price)
    }
}

/// Days after manufacture at which a unit is considered expired.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ShelfLife(u32);

impl ShelfLife {
    pub const DEFAULT_DAYS: u32 = 14;
    /// One century.
    pub const MAX_DAYS: u32 = 36_500;

    /// Fails on zero (every unit would be expired the day it was made) and
    /// above [`Self::MAX_DAYS`].
    pub fn days_checked(days: u32) -> Result<Self, VendingError> {
        if days == 0 {
            return Err(VendingError::validation("shelf life must be at least one day"));
        }
        if days > Self::MAX_DAYS {
            return Err(VendingError::validation(format!(
                "shelf life must be at most {} days",
                Self::MAX_DAYS
            )));
        }
        Ok(Self(days))
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ShelfLife {
    type Error = VendingError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::days_checked(days)
    }
}

impl From<ShelfLife> for u32 {
    fn from(shelf_life: ShelfLife) -> Self {
        shelf_life.0
    }
}

impl Default for ShelfLife {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}
