//! Momentum indicators: RSI, MACD

pub mod macd;
pub mod rsi;
