//! tradewind: a risk-gated signal decision and execution engine.
//!
//! Per watchlist symbol, on a periodic schedule: fetch price history,
//! run the enabled indicators, aggregate their votes into one action,
//! gate it against account risk limits, and submit the resulting order
//! intent. Per-symbol failures are isolated and every tick ends with a
//! summary report.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod execution;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod risk;
pub mod services;
pub mod signals;
