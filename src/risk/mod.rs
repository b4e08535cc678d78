//! Risk gate: turns an aggregate decision into a bounded order intent,
//! or suppresses it.

use crate::config::ExecutionConfig;
use crate::models::account::AccountSnapshot;
use crate::models::order::{OrderSide, PositionIntent};
use crate::models::signal::{Action, AggregateDecision};
use std::collections::HashSet;
use tokio::sync::Mutex;
use tracing::info;

/// Per-tick BUY reservation ledger.
///
/// When symbol evaluations run concurrently, the "would this BUY push
/// the open-position count over the limit" check and the reservation
/// must happen under one lock, or two BUYs could both pass the check
/// and jointly violate `max_positions`. Order submission itself runs
/// outside the lock once the reservation is granted.
#[derive(Default)]
pub struct PositionReservations {
    reserved: Mutex<HashSet<String>>,
}

impl PositionReservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check the position cap and reserve a slot for
    /// `symbol`. Returns false when held + reserved distinct symbols
    /// already fill the cap and the symbol is not among them.
    async fn try_reserve(
        &self,
        symbol: &str,
        snapshot: &AccountSnapshot,
        max_positions: usize,
    ) -> bool {
        let mut reserved = self.reserved.lock().await;
        if snapshot.holds(symbol) || reserved.contains(symbol) {
            return true;
        }
        let occupied = snapshot.distinct_positions()
            + reserved.iter().filter(|s| !snapshot.holds(s)).count();
        if occupied >= max_positions {
            return false;
        }
        reserved.insert(symbol.to_string());
        true
    }

    /// Give back a slot whose intent was suppressed after reservation.
    async fn release(&self, symbol: &str) {
        self.reserved.lock().await.remove(symbol);
    }
}

/// Outcome of gating one decision.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskVerdict {
    /// Decision was HOLD; nothing to gate.
    Hold,
    /// Action suppressed; no order leaves the gate.
    Suppressed { reason: String },
    /// Bounded intent ready for the executor.
    Approved(PositionIntent),
}

pub struct RiskGate;

impl RiskGate {
    /// Gate a decision against the account snapshot and policy.
    ///
    /// `price` is the close of the bar the decision was computed from.
    pub async fn evaluate(
        decision: &AggregateDecision,
        snapshot: &AccountSnapshot,
        price: f64,
        config: &ExecutionConfig,
        reservations: &PositionReservations,
    ) -> RiskVerdict {
        match decision.action {
            Action::Hold => RiskVerdict::Hold,
            Action::Buy => Self::gate_buy(decision, snapshot, price, config, reservations).await,
            Action::Sell => Self::gate_sell(decision, snapshot, price, config),
        }
    }

    async fn gate_buy(
        decision: &AggregateDecision,
        snapshot: &AccountSnapshot,
        price: f64,
        config: &ExecutionConfig,
        reservations: &PositionReservations,
    ) -> RiskVerdict {
        let symbol = &decision.symbol;

        // Policy: never average into an existing position.
        if snapshot.holds(symbol) {
            return suppress(symbol, "already in position");
        }

        if !reservations
            .try_reserve(symbol, snapshot, config.max_positions)
            .await
        {
            return suppress(
                symbol,
                &format!("max positions ({}) reached", config.max_positions),
            );
        }

        if price <= 0.0 {
            reservations.release(symbol).await;
            return suppress(symbol, "no usable price for sizing");
        }

        let notional = snapshot.equity * config.position_size_pct / 100.0;
        let quantity = (notional / price).floor() as u64;
        if quantity < 1 {
            reservations.release(symbol).await;
            return suppress(
                symbol,
                &format!("sized quantity below 1 (notional ${notional:.2} at ${price:.2})"),
            );
        }

        RiskVerdict::Approved(intent(decision, OrderSide::Buy, quantity, config))
    }

    fn gate_sell(
        decision: &AggregateDecision,
        snapshot: &AccountSnapshot,
        price: f64,
        config: &ExecutionConfig,
    ) -> RiskVerdict {
        let symbol = &decision.symbol;

        match snapshot.held_quantity(symbol) {
            // Full-position exit.
            Some(held) => {
                let quantity = held.abs().floor() as u64;
                if quantity < 1 {
                    return suppress(symbol, "held quantity below 1, nothing to exit");
                }
                RiskVerdict::Approved(intent(decision, OrderSide::Sell, quantity, config))
            }
            None if !config.allow_short => suppress(symbol, "no position and shorting disabled"),
            // Short entry, sized like a buy from the configured notional.
            None => {
                if price <= 0.0 {
                    return suppress(symbol, "no usable price for sizing");
                }
                let notional = snapshot.equity * config.position_size_pct / 100.0;
                let quantity = (notional / price).floor() as u64;
                if quantity < 1 {
                    return suppress(
                        symbol,
                        &format!("sized quantity below 1 (notional ${notional:.2} at ${price:.2})"),
                    );
                }
                RiskVerdict::Approved(intent(decision, OrderSide::Sell, quantity, config))
            }
        }
    }
}

fn suppress(symbol: &str, reason: &str) -> RiskVerdict {
    info!(symbol = symbol, reason = reason, "skipping {}: {}", symbol, reason);
    RiskVerdict::Suppressed {
        reason: reason.to_string(),
    }
}

fn intent(
    decision: &AggregateDecision,
    side: OrderSide,
    quantity: u64,
    config: &ExecutionConfig,
) -> PositionIntent {
    PositionIntent {
        symbol: decision.symbol.clone(),
        side,
        quantity,
        order_type: config.order_type,
        time_in_force: config.time_in_force,
        // Symbol plus decision epoch: re-submitting the same decision
        // produces the same key and is caught as a duplicate.
        idempotency_key: format!(
            "{}:{}:{}",
            decision.symbol,
            side,
            decision.decided_at.timestamp()
        ),
    }
}
