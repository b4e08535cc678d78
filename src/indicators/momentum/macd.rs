//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::config::MacdConfig;
use crate::error::DataError;
use crate::models::candle::{closes, Candle};
use crate::models::signal::{IndicatorReading, IndicatorSignal};

pub const NAME: &str = "macd";

/// Compute the MACD line vs. its signal line and detect a crossover.
///
/// MACD = EMA(fast) - EMA(slow), signal = EMA(signal_period) of MACD.
/// This is a crossover indicator: it fires only on the bar where the
/// MACD line crosses its signal line, never again while the relation
/// holds. Both the current and previous line pairs are derived from
/// the same fetched window, so evaluation needs no state across runs.
pub fn compute(candles: &[Candle], config: &MacdConfig) -> Result<IndicatorReading, DataError> {
    // Two signal-line values are needed to observe a transition.
    let need = config.slow_period + config.signal_period + 1;
    if candles.len() < need {
        return Err(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        });
    }

    let closes = closes(candles);

    // MACD series from SMA-seeded running EMAs.
    let mut fast_ema = math::sma(&closes[..config.fast_period], config.fast_period)
        .ok_or(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        })?;
    let mut slow_ema = math::sma(&closes[..config.slow_period], config.slow_period)
        .ok_or(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        })?;

    let mut macd_values = Vec::new();
    for i in config.fast_period..closes.len() {
        fast_ema = math::ema_from_previous(closes[i], fast_ema, config.fast_period);
        if i >= config.slow_period {
            slow_ema = math::ema_from_previous(closes[i], slow_ema, config.slow_period);
            macd_values.push(fast_ema - slow_ema);
        }
    }

    if macd_values.len() < config.signal_period + 1 {
        return Err(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        });
    }

    // Signal line EMA over the MACD series, keeping the last two pairs.
    let mut signal_ema = math::sma(&macd_values[..config.signal_period], config.signal_period)
        .ok_or(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        })?;
    let mut prev_pair = (macd_values[config.signal_period - 1], signal_ema);
    let mut curr_pair = prev_pair;
    for &macd in &macd_values[config.signal_period..] {
        signal_ema = math::ema_from_previous(macd, signal_ema, config.signal_period);
        prev_pair = curr_pair;
        curr_pair = (macd, signal_ema);
    }

    let (macd_line, signal_line) = curr_pair;
    let (prev_macd, prev_signal) = prev_pair;

    let signal = if macd_line > signal_line && prev_macd <= prev_signal {
        Some(IndicatorSignal::Buy)
    } else if macd_line < signal_line && prev_macd >= prev_signal {
        Some(IndicatorSignal::Sell)
    } else {
        None
    };

    Ok(IndicatorReading::new(NAME, signal)
        .with_value("macd_line", macd_line)
        .with_value("macd_signal_line", signal_line)
        .with_value("macd_histogram", macd_line - signal_line))
}
