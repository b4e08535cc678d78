//! Signal evaluation: indicator vote aggregation and the per-symbol engine.

pub mod aggregation;
pub mod engine;

pub use aggregation::{AggregationMode, VoteCounts};
pub use engine::SignalEngine;
