pub mod brood;
pub mod colony;
pub mod config;
pub mod constants;
pub mod field;
pub mod forager;
pub mod metrics;
pub mod pacing;
pub mod rng;

pub use constants::MAX_FIELD_SIZE;
pub use metrics::{ColonySnapshot, QueenSnapshot, RunSummary, StepMetrics};
