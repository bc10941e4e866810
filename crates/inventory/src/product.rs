//! Fixed product line-up the machine is stocked with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vending_core::Money;

use crate::beverage::{Beverage, BeverageKind, BeverageRecord};

/// A product the machine can be restocked with, one per [`BeverageKind`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    OrganicStrawberryMilk,
    SeoulChocoMilk,
    BananasAreNaturallyWhite,
    DietCoke,
    ChilsungCider,
    OrangeFanta,
    TopCoffee,
    CantataCoffee,
    GeorgiaCoffee,
}

struct ProductSheet {
    brand: &'static str,
    capacity_ml: u32,
    price: u64,
    name: &'static str,
    manufacturer: &'static str,
}

impl Product {
    pub const ALL: [Product; 9] = [
        Product::OrganicStrawberryMilk,
        Product::SeoulChocoMilk,
        Product::BananasAreNaturallyWhite,
        Product::DietCoke,
        Product::ChilsungCider,
        Product::OrangeFanta,
        Product::TopCoffee,
        Product::CantataCoffee,
        Product::GeorgiaCoffee,
    ];

    pub fn kind(self) -> BeverageKind {
        match self {
            Product::OrganicStrawberryMilk => BeverageKind::StrawberryMilk,
            Product::SeoulChocoMilk => BeverageKind::ChocolateMilk,
            Product::BananasAreNaturallyWhite => BeverageKind::BananaMilk,
            Product::DietCoke => BeverageKind::Coke,
            Product::ChilsungCider => BeverageKind::Cider,
            Product::OrangeFanta => BeverageKind::Fanta,
            Product::TopCoffee => BeverageKind::TopCoffee,
            Product::CantataCoffee => BeverageKind::CantataCoffee,
            Product::GeorgiaCoffee => BeverageKind::GeorgiaCoffee,
        }
    }

    fn sheet(self) -> ProductSheet {
        match self {
            Product::OrganicStrawberryMilk => ProductSheet {
                brand: "Seoul Milk",
                capacity_ml: 200,
                price: 1000,
                name: "Organic Strawberry Milk",
                manufacturer: "Seoul Dairy Cooperative",
            },
            Product::SeoulChocoMilk => ProductSheet {
                brand: "Seoul Milk",
                capacity_ml: 200,
                price: 1000,
                name: "Seoul Choco Milk",
                manufacturer: "Seoul Dairy Cooperative",
            },
            Product::BananasAreNaturallyWhite => ProductSheet {
                brand: "Maeil",
                capacity_ml: 300,
                price: 1200,
                name: "Bananas Are Naturally White",
                manufacturer: "Maeil Dairies",
            },
            Product::DietCoke => ProductSheet {
                brand: "Coca-Cola",
                capacity_ml: 250,
                price: 1500,
                name: "Diet Coke",
                manufacturer: "Coca-Cola Korea",
            },
            Product::ChilsungCider => ProductSheet {
                brand: "Chilsung",
                capacity_ml: 355,
                price: 1400,
                name: "Chilsung Cider",
                manufacturer: "Lotte Chilsung Beverage",
            },
            Product::OrangeFanta => ProductSheet {
                brand: "Fanta",
                capacity_ml: 355,
                price: 1400,
                name: "Orange Fanta",
                manufacturer: "Coca-Cola Korea",
            },
            Product::TopCoffee => ProductSheet {
                brand: "Maxim",
                capacity_ml: 275,
                price: 2000,
                name: "TOP The Black",
                manufacturer: "Dongsuh Foods",
            },
            Product::CantataCoffee => ProductSheet {
                brand: "Cantata",
                capacity_ml: 275,
                price: 2200,
                name: "Cantata Americano",
                manufacturer: "Lotte Chilsung Beverage",
            },
            Product::GeorgiaCoffee => ProductSheet {
                brand: "Georgia",
                capacity_ml: 240,
                price: 1800,
                name: "Georgia Max Coffee",
                manufacturer: "Coca-Cola Korea",
            },
        }
    }

    /// One unit of this product made at `manufactured_at`.
    pub fn unit(self, manufactured_at: DateTime<Utc>) -> Beverage {
        let sheet = self.sheet();
        Beverage::assemble(BeverageRecord {
            kind: self.kind(),
            brand: sheet.brand.to_string(),
            capacity_ml: sheet.capacity_ml,
            price: Money::new(sheet.price),
            name: sheet.name.to_string(),
            manufactured_at,
            manufacturer: sheet.manufacturer.to_string(),
        })
    }

    /// `count` identical units, ready for a restock.
    pub fn batch(self, count: usize, manufactured_at: DateTime<Utc>) -> Vec<Beverage> {
        (0..count).map(|_| self.unit(manufactured_at)).collect()
    }
}
