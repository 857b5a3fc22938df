//! Threshold grading
//!
//! A group passes when every condition of its [`ThresholdRule`] holds.

mod grader;
mod rule;

pub use grader::{Status, ThresholdGrader};
pub use rule::{Comparator, Condition, ThresholdRule};
