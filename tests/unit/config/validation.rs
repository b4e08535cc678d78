//! Unit tests for settings validation and defaults

use tradewind::config::{Settings, Timeframe};
use tradewind::error::ConfigError;

#[test]
fn defaults_validate() {
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn rejects_all_indicators_disabled() {
    let mut cfg = Settings::default();
    cfg.indicators.rsi.enabled = false;
    cfg.indicators.sma.enabled = false;
    cfg.indicators.macd.enabled = false;
    cfg.indicators.bollinger.enabled = false;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::NoIndicatorsEnabled)
    ));
}

#[test]
fn rejects_inverted_rsi_thresholds() {
    let mut cfg = Settings::default();
    cfg.indicators.rsi.oversold = 80.0;
    cfg.indicators.rsi.overbought = 20.0;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidRsiThresholds { .. })
    ));
}

#[test]
fn inverted_thresholds_pass_when_the_indicator_is_off() {
    let mut cfg = Settings::default();
    cfg.indicators.rsi.enabled = false;
    cfg.indicators.rsi.oversold = 80.0;
    cfg.indicators.rsi.overbought = 20.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_inverted_sma_and_macd_periods() {
    let mut cfg = Settings::default();
    cfg.indicators.sma.short_period = 50;
    cfg.indicators.sma.long_period = 20;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidSmaPeriods { short: 50, long: 20 })
    ));

    let mut cfg = Settings::default();
    cfg.indicators.macd.fast_period = 26;
    cfg.indicators.macd.slow_period = 12;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidMacdPeriods { fast: 26, slow: 12 })
    ));
}

#[test]
fn rejects_zero_min_agree() {
    let mut cfg = Settings::default();
    cfg.signal.min_agree = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMinAgree(0))));
}

#[test]
fn position_size_must_be_a_usable_percentage() {
    for bad in [0.0, -5.0, 150.0] {
        let mut cfg = Settings::default();
        cfg.execution.position_size_pct = bad;
        assert!(
            matches!(cfg.validate(), Err(ConfigError::InvalidPositionSize(_))),
            "accepted {}",
            bad
        );
    }
    let mut cfg = Settings::default();
    cfg.execution.position_size_pct = 100.0;
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_zero_max_positions_and_interval() {
    let mut cfg = Settings::default();
    cfg.execution.max_positions = 0;
    assert!(matches!(
        cfg.validate(),
        Err(ConfigError::InvalidMaxPositions(0))
    ));

    let mut cfg = Settings::default();
    cfg.schedule.interval_minutes = 0;
    assert!(matches!(cfg.validate(), Err(ConfigError::InvalidInterval(0))));
}

#[test]
fn timeframe_round_trips_through_its_wire_name() {
    for (tf, name) in [
        (Timeframe::OneMin, "1Min"),
        (Timeframe::FiveMin, "5Min"),
        (Timeframe::FifteenMin, "15Min"),
        (Timeframe::OneHour, "1Hour"),
        (Timeframe::OneDay, "1Day"),
    ] {
        assert_eq!(tf.as_str(), name);
        assert_eq!(Timeframe::parse(name).unwrap(), tf);
    }
    assert!(matches!(
        Timeframe::parse("2Week"),
        Err(ConfigError::UnknownTimeframe(_))
    ));
}

#[test]
fn market_hours_window_contains_the_session() {
    use chrono::NaiveTime;
    let hours = tradewind::config::MarketHours::default();
    assert!(hours.contains(NaiveTime::from_hms_opt(14, 0, 0).unwrap()));
    assert!(hours.contains(NaiveTime::from_hms_opt(13, 30, 0).unwrap()));
    assert!(!hours.contains(NaiveTime::from_hms_opt(21, 0, 1).unwrap()));
    assert!(!hours.contains(NaiveTime::from_hms_opt(4, 0, 0).unwrap()));
}
