//! Engine configuration from environment variables.
//!
//! | variable                  | default | meaning                               |
//! |---------------------------|---------|---------------------------------------|
//! | `VENDING_SHELF_LIFE_DAYS` | `14`    | age in days at which a unit expires   |
//! | `VENDING_SEED_UNITS`      | `3`     | units per product in the default seed |
//! | `VENDING_LOG_FORMAT`      | `json`  | `json` or `pretty`                    |
//!
//! Unparsable or out-of-range values fall back to the default with a warning.
//! Shelf life is capped at [`ShelfLife::MAX_DAYS`], seed units at
//! [`MAX_SEED_UNITS`].

use core::str::FromStr;

use vending_inventory::ShelfLife;
use vending_observability::LogFormat;

pub const SHELF_LIFE_VAR: &str = "VENDING_SHELF_LIFE_DAYS";
pub const SEED_UNITS_VAR: &str = "VENDING_SEED_UNITS";
pub const LOG_FORMAT_VAR: &str = "VENDING_LOG_FORMAT";

pub const DEFAULT_SEED_UNITS: usize = 3;
pub const MAX_SEED_UNITS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub shelf_life: ShelfLife,
    pub seed_units: usize,
    pub log_format: LogFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shelf_life: ShelfLife::default(),
            seed_units: DEFAULT_SEED_UNITS,
            log_format: LogFormat::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let shelf_life = parse_or(&lookup, SHELF_LIFE_VAR, ShelfLife::DEFAULT_DAYS);
        let shelf_life = ShelfLife::days_checked(shelf_life).unwrap_or_else(|err| {
            tracing::warn!(%err, var = SHELF_LIFE_VAR, "using default shelf life");
            defaults.shelf_life
        });

        let mut seed_units = parse_or(&lookup, SEED_UNITS_VAR, defaults.seed_units);
        if seed_units > MAX_SEED_UNITS {
            tracing::warn!(
                var = SEED_UNITS_VAR,
                value = seed_units,
                max = MAX_SEED_UNITS,
                "seed units out of range; using default"
            );
            seed_units = defaults.seed_units;
        }

        Self {
            shelf_life,
            seed_units,
            log_format: parse_or(&lookup, LOG_FORMAT_VAR, defaults.log_format),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var = key, value = %raw, ?default, "unparsable setting; using default");
            default
        }
    }
}
