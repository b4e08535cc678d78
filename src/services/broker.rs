//! Broker capability consumed by the risk gate and executor.

use crate::error::BrokerError;
use crate::models::account::AccountSnapshot;
use crate::models::order::{OrderResult, PositionIntent};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Order-routing capability. Paper, live, and simulated brokers are
/// interchangeable implementations behind this seam.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Account equity, cash, buying power and open positions.
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError>;

    /// Open positions, symbol -> signed quantity.
    async fn list_positions(&self) -> Result<BTreeMap<String, f64>, BrokerError>;

    /// Submit one order intent.
    async fn submit_order(&self, intent: &PositionIntent) -> Result<OrderResult, BrokerError>;
}
