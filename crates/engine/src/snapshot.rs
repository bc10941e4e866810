//! Opaque, versioned snapshot of the full engine state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vending_core::{Money, VendingError};
use vending_inventory::Beverage;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("unsupported snapshot version {found} (expected {})", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },

    #[error("snapshot violates engine invariants: {0}")]
    Invalid(#[from] VendingError),
}

/// Everything needed to rebuild an engine: stock groups in catalog order,
/// ledger balance, purchase log and the auxiliary status string.
///
/// Treat the encoded form as opaque; only [`EngineSnapshot::from_bytes`] is
/// expected to read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub stock: Vec<Vec<Beverage>>,
    pub balance: Money,
    pub history: Vec<Beverage>,
    #[serde(default)]
    pub status: String,
}

impl EngineSnapshot {
    pub fn new(stock: Vec<Vec<Beverage>>, balance: Money, history: Vec<Beverage>, status: String) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            stock,
            balance,
            history,
            status,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }

    /// Decodes and checks the schema version. Unit-level validation
    /// (e.g. zero capacity) happens while decoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_slice(bytes).map_err(SnapshotError::Decode)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: self.version });
        }
        Ok(())
    }
}
