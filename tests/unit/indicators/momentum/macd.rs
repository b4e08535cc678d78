//! Unit tests for the MACD indicator

use crate::support::candles_from_closes;
use tradewind::config::MacdConfig;
use tradewind::error::DataError;
use tradewind::indicators::momentum::macd;
use tradewind::models::signal::IndicatorSignal;

fn config() -> MacdConfig {
    MacdConfig {
        enabled: true,
        fast_period: 12,
        slow_period: 26,
        signal_period: 9,
    }
}

fn flat_then(tail: &[f64]) -> Vec<f64> {
    let mut closes = vec![100.0; 40];
    closes.extend_from_slice(tail);
    closes
}

#[test]
fn upward_cross_fires_on_transition_bar() {
    // Flat window keeps MACD == signal == 0; the jump lifts the MACD
    // line above its signal line on this bar only.
    let reading = macd::compute(&candles_from_closes(&flat_then(&[110.0])), &config()).unwrap();
    assert!(reading.values["macd_line"] > reading.values["macd_signal_line"]);
    assert_eq!(reading.signal, Some(IndicatorSignal::Buy));
}

#[test]
fn no_refire_while_macd_stays_above_signal() {
    let reading =
        macd::compute(&candles_from_closes(&flat_then(&[110.0, 120.0])), &config()).unwrap();
    assert!(reading.values["macd_line"] > reading.values["macd_signal_line"]);
    assert_eq!(reading.signal, None);
}

#[test]
fn downward_cross_fires_sell() {
    let reading = macd::compute(&candles_from_closes(&flat_then(&[90.0])), &config()).unwrap();
    assert!(reading.values["macd_line"] < reading.values["macd_signal_line"]);
    assert_eq!(reading.signal, Some(IndicatorSignal::Sell));
}

#[test]
fn histogram_is_line_minus_signal() {
    let reading = macd::compute(&candles_from_closes(&flat_then(&[110.0, 115.0])), &config()).unwrap();
    let expected = reading.values["macd_line"] - reading.values["macd_signal_line"];
    assert!((reading.values["macd_histogram"] - expected).abs() < 1e-12);
}

#[test]
fn needs_slow_plus_signal_plus_one_bars() {
    let closes = vec![100.0; 35];
    let err = macd::compute(&candles_from_closes(&closes), &config()).unwrap_err();
    assert!(matches!(
        err,
        DataError::InsufficientHistory { have: 35, need: 36 }
    ));
}
