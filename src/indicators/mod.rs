//! Technical indicators, grouped by category.
//!
//! Each indicator is a pure function of a candle window and its own
//! parameters; none depends on another's output. [`compute_all`] runs
//! the enabled set and turns per-indicator data failures into silent
//! readings instead of pipeline aborts.

pub mod momentum;
pub mod trend;
pub mod volatility;

use crate::config::IndicatorSettings;
use crate::error::DataError;
use crate::models::candle::Candle;
use crate::models::signal::IndicatorReading;
use tracing::debug;

/// Run every enabled indicator over the window.
///
/// Disabled indicators are excluded entirely (they do not appear in
/// the reading set and do not count toward strength). An indicator
/// that fails with a [`DataError`] contributes a silent reading.
pub fn compute_all(candles: &[Candle], settings: &IndicatorSettings) -> Vec<IndicatorReading> {
    let mut readings = Vec::new();

    if settings.rsi.enabled {
        readings.push(reading_or_silent(
            momentum::rsi::NAME,
            momentum::rsi::compute(candles, &settings.rsi),
        ));
    }
    if settings.sma.enabled {
        readings.push(reading_or_silent(
            trend::sma_cross::NAME,
            trend::sma_cross::compute(candles, &settings.sma),
        ));
    }
    if settings.macd.enabled {
        readings.push(reading_or_silent(
            momentum::macd::NAME,
            momentum::macd::compute(candles, &settings.macd),
        ));
    }
    if settings.bollinger.enabled {
        readings.push(reading_or_silent(
            volatility::bollinger::NAME,
            volatility::bollinger::compute(candles, &settings.bollinger),
        ));
    }

    readings
}

fn reading_or_silent(name: &str, result: Result<IndicatorReading, DataError>) -> IndicatorReading {
    match result {
        Ok(reading) => reading,
        Err(e) => {
            debug!(indicator = name, error = %e, "indicator skipped: {}", e);
            IndicatorReading::silent(name)
        }
    }
}
