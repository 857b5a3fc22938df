//! Evaluation runner components
//!
//! This module provides the execution infrastructure: running single groups
//! and sequencing a whole run.

mod config;
mod controller;
mod executor;

pub use config::HarnessConfig;
pub use controller::{ProgressCallback, RunController, RunProgress, exit_code};
pub use executor::{EvaluationRunner, GroupOutcome};
