//! Consensus: modes, tallying, and the deterministic evaluator.

pub mod evaluator;
pub mod mode;
pub mod tally;
