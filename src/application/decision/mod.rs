//! Two-stage price decision.

mod engine;

pub use engine::{exceeds_threshold, DecisionEngine, PRICE_TOLERANCE};
