//! Per-symbol signal evaluation: candles in, decision out.

use crate::config::Settings;
use crate::indicators;
use crate::models::candle::Candle;
use crate::models::signal::{Action, AggregateDecision};
use crate::signals::aggregation;
use chrono::Utc;
use tracing::debug;

pub struct SignalEngine;

impl SignalEngine {
    /// Evaluate the enabled indicators over the window and aggregate
    /// their votes into one decision.
    ///
    /// An empty window degrades to a zero-strength HOLD, the same way
    /// an all-silent reading set does; the pipeline never aborts here.
    pub fn evaluate(symbol: &str, candles: &[Candle], settings: &Settings) -> AggregateDecision {
        let decided_at = candles
            .last()
            .map(|c| c.timestamp)
            .unwrap_or_else(Utc::now);

        let readings = indicators::compute_all(candles, &settings.indicators);
        let votes = aggregation::tally(&readings);
        let action = if readings.is_empty() {
            Action::Hold
        } else {
            aggregation::decide(votes, settings.signal.aggregation_mode())
        };
        let strength = aggregation::strength(votes);

        debug!(
            symbol = symbol,
            action = %action,
            strength = strength,
            buy_votes = votes.buy,
            sell_votes = votes.sell,
            "evaluated {}: {} (strength {:.0}%)",
            symbol,
            action,
            strength * 100.0
        );

        AggregateDecision {
            symbol: symbol.to_string(),
            action,
            strength,
            contributing: readings
                .into_iter()
                .map(|r| (r.name, r.signal))
                .collect(),
            decided_at,
        }
    }
}
