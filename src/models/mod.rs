//! Shared data models spanning the engine layers.

pub mod account;
pub mod candle;
pub mod order;
pub mod run;
pub mod signal;

pub use account::AccountSnapshot;
pub use candle::Candle;
pub use order::{
    ExecutionOutcome, ExecutionReport, OrderResult, OrderSide, OrderType, PositionIntent,
    TimeInForce,
};
pub use run::{RunResult, RunSummary, SymbolOutcome};
pub use signal::{Action, AggregateDecision, IndicatorReading, IndicatorSignal};
