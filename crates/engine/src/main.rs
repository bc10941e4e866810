use anyhow::Context;
use chrono::{Duration, Utc};

use vending_accounting::CashUnit;
use vending_engine::{DefaultStock, EngineConfig, EngineSnapshot, InventoryEngine, StockBus};
use vending_events::Event;
use vending_inventory::Product;

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::from_env();
    vending_observability::init(config.log_format);

    let now = Utc::now();
    let stale = now
        .checked_sub_signed(Duration::days(i64::from(config.shelf_life.days())))
        .context("shelf life reaches outside the calendar")?;

    let mut engine = InventoryEngine::seeded(&DefaultStock::new(config.seed_units, now), &config)
        .context("failed to seed engine")?;
    let changes = engine.subscribe();

    engine.insert_cash(CashUnit::FiveThousand);
    engine.insert_cash(CashUnit::Thousand);

    match engine.purchase_with_balance(0) {
        Ok(unit) => tracing::info!(%unit, "dispensed"),
        Err(err) => tracing::warn!(%err, "purchase failed"),
    }

    engine
        .restock(Product::GeorgiaCoffee.batch(2, stale))
        .context("failed to restock")?;

    match engine.run_expiration_maintenance(now) {
        Ok(removed) => tracing::info!(removed = removed.len(), "maintenance done"),
        Err(err) => tracing::info!(%err, "maintenance skipped"),
    }
    engine.set_status("simulation finished");

    for change in changes.drain() {
        tracing::info!(
            event_type = change.event_type(),
            version = change.version(),
            revision = change.revision,
            occurred_at = %change.occurred_at(),
            "stock changed"
        );
    }

    let bytes = engine.snapshot().to_bytes().context("failed to encode snapshot")?;
    let restored = InventoryEngine::restore(
        EngineSnapshot::from_bytes(&bytes).context("failed to decode snapshot")?,
        StockBus::new(),
        &config,
    )
    .context("failed to restore snapshot")?;

    tracing::info!(
        snapshot_bytes = bytes.len(),
        groups = restored.stock_list().len(),
        balance = %restored.balance(),
        purchases = restored.history().len(),
        status = restored.status(),
        "snapshot round-trip complete"
    );

    Ok(())
}
