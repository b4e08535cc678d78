//! Order intents and execution reports

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    Day,
    Gtc,
    Ioc,
}

/// A concrete, risk-bounded order request produced by the risk gate.
///
/// Ephemeral: lives for one tick, never persisted. The idempotency key
/// identifies the (symbol, decision epoch) pair so a re-submitted
/// decision is detectable as a duplicate within the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: u64,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub idempotency_key: String,
}

impl PositionIntent {
    pub fn describe(&self) -> String {
        format!(
            "{} {} qty={} ({:?}/{:?})",
            match self.side {
                OrderSide::Buy => "BUY",
                OrderSide::Sell => "SELL",
            },
            self.symbol,
            self.quantity,
            self.order_type,
            self.time_in_force,
        )
    }
}

/// Broker acknowledgement for a submitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: String,
    pub status: String,
}

/// What the executor recorded for a submitted intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: String,
    pub status: String,
}

impl From<OrderResult> for ExecutionReport {
    fn from(r: OrderResult) -> Self {
        Self {
            order_id: r.order_id,
            status: r.status,
        }
    }
}

/// Outcome of pushing one symbol's decision through risk + execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Decision was HOLD; nothing to do.
    Held,
    /// Risk gate suppressed the action.
    Suppressed { reason: String },
    /// Dry-run mode: the order that would have been submitted.
    DryRun { description: String },
    /// Order submitted to the broker.
    Submitted { report: ExecutionReport },
    /// Same idempotency key already submitted this run.
    Duplicate,
}
