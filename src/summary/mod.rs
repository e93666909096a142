//! Message accumulation, the flush cycle and event routing

pub mod accumulator;
pub mod compose;
pub mod plugin;

pub use accumulator::SummaryAccumulator;
pub use compose::{compose_summary, produce_summary};
pub use plugin::{EventOutcome, SummaryPlugin};
