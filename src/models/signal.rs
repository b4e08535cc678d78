//! Indicator readings and aggregate trading decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directional vote from a single indicator. An indicator that sees no
/// setup contributes `None` rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorSignal {
    Buy,
    Sell,
}

/// One indicator's output for one evaluation: its vote (if any) plus
/// the raw values behind it, kept for the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub name: String,
    pub signal: Option<IndicatorSignal>,
    pub values: BTreeMap<String, f64>,
}

impl IndicatorReading {
    pub fn new(name: impl Into<String>, signal: Option<IndicatorSignal>) -> Self {
        Self {
            name: name.into(),
            signal,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Reading for an indicator that failed to compute (e.g. not enough
    /// history). Carries no vote and no values.
    pub fn silent(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Aggregate action across all enabled indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Combined decision for one symbol at one evaluation.
///
/// `strength` is the fraction of enabled indicators agreeing with the
/// winning side, defined relative to the enabled set only. A HOLD still
/// carries the vote-derived strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateDecision {
    pub symbol: String,
    pub action: Action,
    pub strength: f64,
    pub contributing: BTreeMap<String, Option<IndicatorSignal>>,
    /// Timestamp of the bar the decision was computed from; the
    /// decision epoch used for idempotency keys.
    pub decided_at: DateTime<Utc>,
}
