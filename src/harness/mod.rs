//! Batch driver: runs agents against houses and records the outcome.

pub mod report;
pub mod runner;

pub use report::{RunResult, RunStatus, ScoreTable};
pub use runner::{default_timeout, run_all, run_single, BatchConfig};
