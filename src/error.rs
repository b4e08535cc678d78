//! Error taxonomy for the signal and execution pipeline.
//!
//! Three families with distinct blast radii:
//! - [`DataError`]: indicator-local, the affected indicator contributes no signal
//! - [`ConfigError`]: startup-fatal, checked before the first scheduler tick
//! - [`BrokerError`]: per-call, classified so the executor knows what to retry

use thiserror::Error;

/// Failures while fetching or interpreting price history.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("insufficient history: have {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("price history provider error: {0}")]
    Provider(String),

    #[error("price history fetch timed out after {0}s")]
    Timeout(u64),
}

/// Invalid configuration, rejected before the scheduler starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no indicators enabled; enable at least one")]
    NoIndicatorsEnabled,

    #[error("rsi thresholds invalid: oversold {oversold} must be below overbought {overbought}")]
    InvalidRsiThresholds { oversold: f64, overbought: f64 },

    #[error("sma crossover periods invalid: short {short} must be below long {long}")]
    InvalidSmaPeriods { short: usize, long: usize },

    #[error("macd periods invalid: fast {fast} must be below slow {slow}")]
    InvalidMacdPeriods { fast: usize, slow: usize },

    #[error("signal.min_agree must be at least 1, got {0}")]
    InvalidMinAgree(usize),

    #[error("execution.position_size_pct must be in (0, 100], got {0}")]
    InvalidPositionSize(f64),

    #[error("execution.max_positions must be at least 1, got {0}")]
    InvalidMaxPositions(usize),

    #[error("unknown timeframe '{0}' (valid: 1Min, 5Min, 15Min, 1Hour, 1Day)")]
    UnknownTimeframe(String),

    #[error("schedule.interval_minutes must be at least 1, got {0}")]
    InvalidInterval(u64),

    #[error("{0}")]
    Invalid(String),
}

/// Broker call failures, classified for retry policy.
///
/// `Transient` and `RateLimited` are retried with backoff; `Rejected`
/// is recorded per-symbol; `AuthFailure` aborts the rest of the tick.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("transient broker error: {0}")]
    Transient(String),

    #[error("broker rate limit hit: {0}")]
    RateLimited(String),

    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("broker authentication failed: {0}")]
    AuthFailure(String),
}

impl BrokerError {
    /// Whether the executor should retry this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BrokerError::Transient(_) | BrokerError::RateLimited(_))
    }
}

/// Umbrella error for the engine surface (runner, scheduler wiring).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("invalid cron expression '{expr}': {source}")]
    Schedule {
        expr: String,
        #[source]
        source: cron::error::Error,
    },
}
