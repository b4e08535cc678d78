//! RSI (Relative Strength Index) indicator

use crate::config::RsiConfig;
use crate::error::DataError;
use crate::models::candle::Candle;
use crate::models::signal::{IndicatorReading, IndicatorSignal};

pub const NAME: &str = "rsi";

/// Compute RSI over the last `period` deltas and derive its signal.
///
/// RSI = 100 - (100 / (1 + RS)), RS = average gain / average loss.
/// Buy when RSI drops below the oversold threshold, sell when it rises
/// above overbought.
pub fn compute(candles: &[Candle], config: &RsiConfig) -> Result<IndicatorReading, DataError> {
    let need = config.period + 1;
    if candles.len() < need {
        return Err(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        });
    }

    let mut gains = Vec::with_capacity(candles.len() - 1);
    let mut losses = Vec::with_capacity(candles.len() - 1);
    for pair in candles.windows(2) {
        let change = pair[1].close - pair[0].close;
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let period = config.period as f64;
    let avg_gain: f64 = gains.iter().rev().take(config.period).sum::<f64>() / period;
    let avg_loss: f64 = losses.iter().rev().take(config.period).sum::<f64>() / period;

    let rsi = if avg_gain == 0.0 && avg_loss == 0.0 {
        // No movement in the window reads as neutral, not overbought.
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    let signal = if rsi < config.oversold {
        Some(IndicatorSignal::Buy)
    } else if rsi > config.overbought {
        Some(IndicatorSignal::Sell)
    } else {
        None
    };

    Ok(IndicatorReading::new(NAME, signal).with_value("rsi", rsi))
}
