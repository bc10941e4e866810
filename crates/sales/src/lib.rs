//! Sales record of the machine: what was sold, and how often per kind.

pub mod history;

pub use history::PurchaseHistory;
