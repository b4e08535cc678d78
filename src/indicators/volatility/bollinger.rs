//! Bollinger Bands indicator

use crate::common::math;
use crate::config::BollingerConfig;
use crate::error::DataError;
use crate::models::candle::{closes, Candle};
use crate::models::signal::{IndicatorReading, IndicatorSignal};

pub const NAME: &str = "bollinger";

/// Compute Bollinger Bands and derive the band-touch signal.
///
/// Middle = SMA(period), bands = middle +/- std_dev * sigma(period).
/// Threshold indicator: buy fires on every bar the close sits at or
/// below the lower band, sell at or above the upper band.
pub fn compute(candles: &[Candle], config: &BollingerConfig) -> Result<IndicatorReading, DataError> {
    if candles.len() < config.period {
        return Err(DataError::InsufficientHistory {
            have: candles.len(),
            need: config.period,
        });
    }

    let closes = closes(candles);
    let err = || DataError::InsufficientHistory {
        have: candles.len(),
        need: config.period,
    };
    let middle = math::sma(&closes, config.period).ok_or_else(err)?;
    let std = math::standard_deviation(&closes, config.period).ok_or_else(err)?;

    let upper = middle + config.std_dev * std;
    let lower = middle - config.std_dev * std;
    let close = closes[closes.len() - 1];

    let signal = if close <= lower {
        Some(IndicatorSignal::Buy)
    } else if close >= upper {
        Some(IndicatorSignal::Sell)
    } else {
        None
    };

    Ok(IndicatorReading::new(NAME, signal)
        .with_value("bb_upper", upper)
        .with_value("bb_middle", middle)
        .with_value("bb_lower", lower))
}
