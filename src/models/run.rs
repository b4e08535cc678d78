//! Per-tick run report

use crate::models::order::ExecutionOutcome;
use crate::models::signal::{Action, AggregateDecision};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What happened to one watchlist symbol during a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolOutcome {
    pub decision: Option<AggregateDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolOutcome {
    pub fn succeeded(decision: AggregateDecision, execution: ExecutionOutcome) -> Self {
        Self {
            decision: Some(decision),
            execution: Some(execution),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            decision: None,
            execution: None,
            error: Some(error.into()),
        }
    }

    /// Failure after a decision was reached (e.g. broker rejected the order).
    pub fn failed_after_decision(decision: AggregateDecision, error: impl Into<String>) -> Self {
        Self {
            decision: Some(decision),
            execution: None,
            error: Some(error.into()),
        }
    }
}

/// Summary counts for one tick, emitted with the run log line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbols_evaluated: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub holds: usize,
    pub trades_executed: usize,
    pub errors: usize,
}

/// Result of one scheduler tick across the whole watchlist. Built once
/// per tick and discarded after reporting; callers read it to tell
/// partial success from total failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    pub per_symbol: BTreeMap<String, SymbolOutcome>,
    pub summary: RunSummary,
    /// Set when the tick was cut short (auth failure aborts the rest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl RunResult {
    pub fn record(&mut self, symbol: &str, outcome: SymbolOutcome) {
        if let Some(decision) = &outcome.decision {
            self.summary.symbols_evaluated += 1;
            match decision.action {
                Action::Buy => self.summary.buy_signals += 1,
                Action::Sell => self.summary.sell_signals += 1,
                Action::Hold => self.summary.holds += 1,
            }
        }
        if matches!(
            outcome.execution,
            Some(ExecutionOutcome::Submitted { .. }) | Some(ExecutionOutcome::DryRun { .. })
        ) && outcome
            .decision
            .as_ref()
            .is_some_and(|d| d.action != Action::Hold)
        {
            self.summary.trades_executed += 1;
        }
        if outcome.error.is_some() {
            self.summary.errors += 1;
        }
        self.per_symbol.insert(symbol.to_string(), outcome);
    }

    /// One-line human-readable summary, mirroring the run log.
    pub fn summary_line(&self) -> String {
        let s = &self.summary;
        let mut line = format!(
            "{} signals checked, {} BUY, {} SELL, {} trades executed, {} errors",
            s.symbols_evaluated, s.buy_signals, s.sell_signals, s.trades_executed, s.errors
        );
        if let Some(reason) = &self.aborted {
            line.push_str(&format!(" (tick aborted: {reason})"));
        }
        line
    }
}
