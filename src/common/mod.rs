//! Cross-cutting helpers shared by the engine layers.

pub mod math;
