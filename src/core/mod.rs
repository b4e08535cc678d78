//! Core orchestration: the tick engine and its scheduler.

pub mod engine;
pub mod scheduler;

pub use engine::TickEngine;
pub use scheduler::{SchedulerState, TradingScheduler};
