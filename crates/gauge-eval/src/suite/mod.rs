//! Evaluation suites
//!
//! A suite is the static configuration of a run: its groups, their
//! datasets, evaluators, column mappings and threshold rules, plus the
//! summary location. Suites are loaded once and never mutated.

mod group;
mod loader;
mod schema;

pub use group::EvaluationGroup;
pub use loader::{Suite, SuiteLoader};
pub use schema::{ConditionDefinition, EvaluatorDefinition, GroupDefinition, SuiteFile};
