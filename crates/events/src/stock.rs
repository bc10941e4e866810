use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// What kind of mutation changed the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockChangeCause {
    Purchase,
    Restock,
    ExpiredRemoval,
}

/// Notification: the stock composition changed; re-read `stock_list()`.
///
/// Carries no stock data on purpose. `revision` increases by one per
/// notification from the same engine, so observers can detect gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChanged {
    pub revision: u64,
    pub cause: StockChangeCause,
    pub occurred_at: DateTime<Utc>,
}

impl StockChanged {
    pub fn new(revision: u64, cause: StockChangeCause) -> Self {
        Self {
            revision,
            cause,
            occurred_at: Utc::now(),
        }
    }
}

impl Event for StockChanged {
    fn event_type(&self) -> &'static str {
        match self.cause {
            StockChangeCause::Purchase => "vending.stock.purchased",
            StockChangeCause::Restock => "vending.stock.restocked",
            StockChangeCause::ExpiredRemoval => "vending.stock.expired_removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_follows_cause() {
        let change = StockChanged::new(3, StockChangeCause::ExpiredRemoval);
        assert_eq!(change.event_type(), "vending.stock.expired_removed");
        assert_eq!(change.version(), 1);
    }

    #[test]
    fn cause_serializes_snake_case() {
        let json = serde_json::to_string(&StockChangeCause::ExpiredRemoval).unwrap();
        assert_eq!(json, "\"expired_removal\"");
    }
}
