//! Volatility indicators: Bollinger Bands

pub mod bollinger;
