//! Thread-safe handle around an engine.
//!
//! `purchase` reads the balance and then deducts; two callers interleaving
//! those steps could both pass the check against the same stale balance.
//! Holding one lock for the whole operation rules that out.

use std::sync::{Arc, Mutex};

use vending_core::{VendingError, VendingResult};
use vending_events::{EventBus, StockChanged};

use crate::engine::{InventoryEngine, StockBus};

pub struct SharedEngine<B = StockBus>
where
    B: EventBus<StockChanged>,
{
    inner: Arc<Mutex<InventoryEngine<B>>>,
}

impl<B> Clone for SharedEngine<B>
where
    B: EventBus<StockChanged>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B> SharedEngine<B>
where
    B: EventBus<StockChanged>,
{
    pub fn new(engine: InventoryEngine<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs `op` as one critical section.
    pub fn with<R>(&self, op: impl FnOnce(&mut InventoryEngine<B>) -> VendingResult<R>) -> VendingResult<R> {
        let mut engine = self
            .inner
            .lock()
            .map_err(|_| VendingError::invariant("engine lock poisoned"))?;
        op(&mut engine)
    }

    /// Read-only access under the same lock.
    pub fn read<R>(&self, op: impl FnOnce(&InventoryEngine<B>) -> R) -> VendingResult<R> {
        let engine = self
            .inner
            .lock()
            .map_err(|_| VendingError::invariant("engine lock poisoned"))?;
        Ok(op(&engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::seed::FixedStock;
    use chrono::Utc;
    use std::thread;
    use vending_core::Money;
    use vending_inventory::Product;

    #[test]
    fn concurrent_buyers_cannot_both_spend_the_same_balance() {
        let source = FixedStock::new(vec![Product::DietCoke.batch(8, Utc::now())]);
        let mut engine = InventoryEngine::seeded(&source, &EngineConfig::default()).unwrap();
        engine.deposit(Money::new(1_500));
        let shared = SharedEngine::new(engine);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.with(|engine| engine.purchase_with_balance(0)).is_ok())
            })
            .collect();
        let sold = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(sold, 1);
        assert_eq!(shared.read(|engine| engine.balance()).unwrap(), Money::ZERO);
        assert_eq!(shared.read(|engine| engine.history().len()).unwrap(), 1);
    }
}
