//! Price history capability consumed by the engine.

use crate::config::Timeframe;
use crate::error::DataError;
use crate::models::candle::Candle;
use async_trait::async_trait;

/// Source of historical OHLCV bars.
///
/// Implementations must return bars ordered ascending by timestamp.
/// The engine fetches a fresh window per evaluation and never caches
/// across ticks.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Vec<Candle>, DataError>;
}
