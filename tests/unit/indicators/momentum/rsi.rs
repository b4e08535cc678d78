//! Unit tests for the RSI indicator

use crate::support::candles_from_closes;
use tradewind::config::RsiConfig;
use tradewind::error::DataError;
use tradewind::indicators::momentum::rsi;
use tradewind::models::signal::IndicatorSignal;

fn config() -> RsiConfig {
    RsiConfig {
        enabled: true,
        period: 14,
        overbought: 70.0,
        oversold: 30.0,
    }
}

#[test]
fn steady_decline_signals_buy() {
    // No gains in the window pushes RSI to 0, under the oversold line.
    let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64 * 3.0).collect();
    let reading = rsi::compute(&candles_from_closes(&closes), &config()).unwrap();
    let value = reading.values["rsi"];
    assert!(value < 30.0, "rsi {value} should be oversold");
    assert_eq!(reading.signal, Some(IndicatorSignal::Buy));
}

#[test]
fn steady_climb_signals_sell() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64 * 3.0).collect();
    let reading = rsi::compute(&candles_from_closes(&closes), &config()).unwrap();
    assert_eq!(reading.values["rsi"], 100.0);
    assert_eq!(reading.signal, Some(IndicatorSignal::Sell));
}

#[test]
fn mixed_window_stays_silent() {
    let closes: Vec<f64> = (0..30)
        .map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    let reading = rsi::compute(&candles_from_closes(&closes), &config()).unwrap();
    let value = reading.values["rsi"];
    assert!((30.0..=70.0).contains(&value), "rsi {value} should be neutral");
    assert_eq!(reading.signal, None);
}

#[test]
fn rsi_stays_in_range() {
    let closes: Vec<f64> = (0..60)
        .map(|i| 150.0 + (i as f64 * 0.7).sin() * 10.0)
        .collect();
    let reading = rsi::compute(&candles_from_closes(&closes), &config()).unwrap();
    let value = reading.values["rsi"];
    assert!((0.0..=100.0).contains(&value));
}

#[test]
fn needs_period_plus_one_bars() {
    let closes = vec![100.0; 14];
    let err = rsi::compute(&candles_from_closes(&closes), &config()).unwrap_err();
    assert!(matches!(
        err,
        DataError::InsufficientHistory { have: 14, need: 15 }
    ));
}
