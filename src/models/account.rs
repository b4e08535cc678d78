//! Broker account state consumed by the risk gate

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time view of the trading account. Re-fetched at the start
/// of every tick and never cached across ticks, so risk decisions are
/// never made against stale positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub equity: f64,
    pub cash: f64,
    pub buying_power: f64,
    /// Open positions, symbol -> signed quantity.
    pub open_positions: BTreeMap<String, f64>,
}

impl AccountSnapshot {
    pub fn held_quantity(&self, symbol: &str) -> Option<f64> {
        self.open_positions.get(symbol).copied()
    }

    pub fn holds(&self, symbol: &str) -> bool {
        self.open_positions.contains_key(symbol)
    }

    pub fn distinct_positions(&self) -> usize {
        self.open_positions.len()
    }
}
