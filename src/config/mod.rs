//! Typed engine configuration.
//!
//! The engine consumes a validated [`Settings`] tree; where it comes
//! from (env, file, dashboard) is the caller's business. Validation
//! happens once at startup so that misconfiguration can never surface
//! mid-tick.

use crate::error::ConfigError;
use crate::models::order::{OrderType, TimeInForce};
use crate::signals::aggregation::AggregationMode;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;

/// Deployment environment from `ENVIRONMENT`, defaulting to sandbox.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiConfig {
    pub enabled: bool,
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmaConfig {
    pub enabled: bool,
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for SmaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            short_period: 20,
            long_period: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdConfig {
    pub enabled: bool,
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BollingerConfig {
    pub enabled: bool,
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub rsi: RsiConfig,
    pub sma: SmaConfig,
    pub macd: MacdConfig,
    pub bollinger: BollingerConfig,
}

impl IndicatorSettings {
    pub fn enabled_count(&self) -> usize {
        [
            self.rsi.enabled,
            self.sma.enabled,
            self.macd.enabled,
            self.bollinger.enabled,
        ]
        .iter()
        .filter(|e| **e)
        .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    Majority,
    Unanimous,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    pub mode: SignalMode,
    pub min_agree: usize,
}

impl SignalConfig {
    /// The tagged aggregation variant the engine runs with.
    pub fn aggregation_mode(&self) -> AggregationMode {
        match self.mode {
            SignalMode::Majority => AggregationMode::Majority {
                min_agree: self.min_agree,
            },
            SignalMode::Unanimous => AggregationMode::Unanimous,
            SignalMode::Any => AggregationMode::Any,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            mode: SignalMode::Majority,
            min_agree: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    /// Percent of account equity committed per new position.
    pub position_size_pct: f64,
    /// Cap on distinct symbols held at once.
    pub max_positions: usize,
    pub allow_short: bool,
    /// Kill-switch: compute and record intents, never submit.
    pub dry_run: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            position_size_pct: 5.0,
            max_positions: 10,
            allow_short: false,
            dry_run: true,
        }
    }
}

/// Bar timeframe for history fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1Min")]
    OneMin,
    #[serde(rename = "5Min")]
    FiveMin,
    #[serde(rename = "15Min")]
    FifteenMin,
    #[serde(rename = "1Hour")]
    OneHour,
    #[serde(rename = "1Day")]
    OneDay,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMin => "1Min",
            Timeframe::FiveMin => "5Min",
            Timeframe::FifteenMin => "15Min",
            Timeframe::OneHour => "1Hour",
            Timeframe::OneDay => "1Day",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "1Min" => Ok(Timeframe::OneMin),
            "5Min" => Ok(Timeframe::FiveMin),
            "15Min" => Ok(Timeframe::FifteenMin),
            "1Hour" => Ok(Timeframe::OneHour),
            "1Day" => Ok(Timeframe::OneDay),
            other => Err(ConfigError::UnknownTimeframe(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub timeframe: Timeframe,
    pub lookback_days: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::OneDay,
            lookback_days: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub interval_minutes: u64,
    pub market_hours_only: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            market_hours_only: true,
        }
    }
}

/// Trading session window, compared in UTC. An explicit value passed
/// into the scheduler, not ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl MarketHours {
    pub fn contains(&self, now: NaiveTime) -> bool {
        self.open <= now && now <= self.close
    }
}

impl Default for MarketHours {
    fn default() -> Self {
        // Conservative NYSE window covering both EST and EDT offsets.
        Self {
            open: NaiveTime::from_hms_opt(13, 30, 0).unwrap(),
            close: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub indicators: IndicatorSettings,
    pub signal: SignalConfig,
    pub execution: ExecutionConfig,
    pub data: DataConfig,
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub market_hours: MarketHours,
}

impl Settings {
    /// Startup validation gate. Runs before the first tick; a failure
    /// here is fatal so that per-tick code never has to re-check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indicators.enabled_count() == 0 {
            return Err(ConfigError::NoIndicatorsEnabled);
        }
        let rsi = &self.indicators.rsi;
        if rsi.enabled && rsi.oversold >= rsi.overbought {
            return Err(ConfigError::InvalidRsiThresholds {
                oversold: rsi.oversold,
                overbought: rsi.overbought,
            });
        }
        let sma = &self.indicators.sma;
        if sma.enabled && sma.short_period >= sma.long_period {
            return Err(ConfigError::InvalidSmaPeriods {
                short: sma.short_period,
                long: sma.long_period,
            });
        }
        let macd = &self.indicators.macd;
        if macd.enabled && macd.fast_period >= macd.slow_period {
            return Err(ConfigError::InvalidMacdPeriods {
                fast: macd.fast_period,
                slow: macd.slow_period,
            });
        }
        if self.signal.min_agree < 1 {
            return Err(ConfigError::InvalidMinAgree(self.signal.min_agree));
        }
        if !(self.execution.position_size_pct > 0.0 && self.execution.position_size_pct <= 100.0) {
            return Err(ConfigError::InvalidPositionSize(
                self.execution.position_size_pct,
            ));
        }
        if self.execution.max_positions < 1 {
            return Err(ConfigError::InvalidMaxPositions(self.execution.max_positions));
        }
        if self.schedule.interval_minutes < 1 {
            return Err(ConfigError::InvalidInterval(self.schedule.interval_minutes));
        }
        Ok(())
    }
}
