//! Trend indicators: SMA crossover

pub mod sma_cross;
