//! Multi-indicator vote aggregation

use crate::models::signal::{Action, IndicatorReading, IndicatorSignal};
use serde::{Deserialize, Serialize};

/// How indicator votes combine into one action.
///
/// A tagged variant rather than a mode string, so an unknown mode
/// cannot survive past deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AggregationMode {
    /// At least `min_agree` indicators on the winning side, and that
    /// side must out-vote the other.
    Majority { min_agree: usize },
    /// Every indicator that fired must agree; silence does not veto,
    /// but all-silent yields HOLD.
    Unanimous,
    /// A single vote suffices as long as nothing votes the other way.
    Any,
}

/// Vote tally over one reading set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCounts {
    pub buy: usize,
    pub sell: usize,
    pub total_enabled: usize,
}

pub fn tally(readings: &[IndicatorReading]) -> VoteCounts {
    let buy = readings
        .iter()
        .filter(|r| r.signal == Some(IndicatorSignal::Buy))
        .count();
    let sell = readings
        .iter()
        .filter(|r| r.signal == Some(IndicatorSignal::Sell))
        .count();
    VoteCounts {
        buy,
        sell,
        total_enabled: readings.len(),
    }
}

/// Decide the action for a tally under the given mode.
///
/// Pure function of the votes and mode; no state across evaluations.
pub fn decide(votes: VoteCounts, mode: AggregationMode) -> Action {
    match mode {
        AggregationMode::Majority { min_agree } => {
            if votes.buy >= min_agree && votes.buy > votes.sell {
                Action::Buy
            } else if votes.sell >= min_agree && votes.sell > votes.buy {
                Action::Sell
            } else {
                Action::Hold
            }
        }
        AggregationMode::Unanimous => {
            if votes.buy > 0 && votes.sell == 0 {
                Action::Buy
            } else if votes.sell > 0 && votes.buy == 0 {
                Action::Sell
            } else {
                Action::Hold
            }
        }
        AggregationMode::Any => {
            if votes.buy >= 1 && votes.sell == 0 {
                Action::Buy
            } else if votes.sell >= 1 && votes.buy == 0 {
                Action::Sell
            } else {
                Action::Hold
            }
        }
    }
}

/// Fraction of enabled indicators agreeing with the winning side.
/// Defined only relative to the enabled set; a HOLD still gets its
/// vote-derived strength. `total_enabled == 0` never reaches here in a
/// validated configuration, but degrades to 0.0 rather than dividing.
pub fn strength(votes: VoteCounts) -> f64 {
    if votes.total_enabled == 0 {
        return 0.0;
    }
    votes.buy.max(votes.sell) as f64 / votes.total_enabled as f64
}
