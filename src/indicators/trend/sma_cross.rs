//! SMA crossover (golden/death cross) indicator

use crate::common::math;
use crate::config::SmaConfig;
use crate::error::DataError;
use crate::models::candle::{closes, Candle};
use crate::models::signal::{IndicatorReading, IndicatorSignal};

pub const NAME: &str = "sma";

/// Detect a short/long SMA crossover at the latest bar.
///
/// Fires buy only on the bar where the short average moves above the
/// long one (short > long now, short <= long on the previous bar), and
/// the mirrored sell on the downward cross. While the relation merely
/// persists, no signal fires. The previous bar's averages come from the
/// same window, shifted by one.
pub fn compute(candles: &[Candle], config: &SmaConfig) -> Result<IndicatorReading, DataError> {
    // One extra bar so the previous (short, long) pair exists too.
    let need = config.long_period + 1;
    if candles.len() < need {
        return Err(DataError::InsufficientHistory {
            have: candles.len(),
            need,
        });
    }

    let closes = closes(candles);
    let prev = &closes[..closes.len() - 1];

    let err = || DataError::InsufficientHistory {
        have: candles.len(),
        need,
    };
    let short = math::sma(&closes, config.short_period).ok_or_else(err)?;
    let long = math::sma(&closes, config.long_period).ok_or_else(err)?;
    let prev_short = math::sma(prev, config.short_period).ok_or_else(err)?;
    let prev_long = math::sma(prev, config.long_period).ok_or_else(err)?;

    let signal = if short > long && prev_short <= prev_long {
        Some(IndicatorSignal::Buy)
    } else if short < long && prev_short >= prev_long {
        Some(IndicatorSignal::Sell)
    } else {
        None
    };

    Ok(IndicatorReading::new(NAME, signal)
        .with_value("sma_short", short)
        .with_value("sma_long", long))
}
