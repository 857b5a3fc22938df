//! Evaluator contract
//!
//! An evaluator judges one dataset row, given as named inputs resolved
//! through the group's column mapping, and returns numeric scores keyed by
//! metric name. The batch service averages those scores across rows.

mod builtin;

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

pub use builtin::{
    EvaluatorSpec, ExactMatchEvaluator, FieldTypesEvaluator, FieldsPresentEvaluator, JsonType,
    NumericMatchEvaluator, ResponseTimeEvaluator,
};

/// Named inputs for one row: input parameter → value
pub type RowInputs = BTreeMap<String, Value>;

/// Scores for one row: metric name → value
pub type RowScores = BTreeMap<String, f64>;

/// Error raised by an evaluator on a single row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluatorError {
    #[error("missing input '{0}'")]
    MissingInput(String),

    #[error("input '{input}' must be {expected}, got {actual}")]
    InvalidInput {
        input: String,
        expected: &'static str,
        actual: String,
    },

    #[error("{0}")]
    Failed(String),
}

/// A pluggable scorer
pub trait Evaluator: std::fmt::Debug + Send + Sync {
    /// Input parameters the column mapping must provide
    fn required_inputs(&self) -> &[&'static str];

    /// Score one row
    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError>;
}

/// Look up a required input
pub fn input<'a>(inputs: &'a RowInputs, name: &str) -> Result<&'a Value, EvaluatorError> {
    inputs
        .get(name)
        .ok_or_else(|| EvaluatorError::MissingInput(name.to_string()))
}

/// Look up a required numeric input
pub fn number_input(inputs: &RowInputs, name: &str) -> Result<f64, EvaluatorError> {
    let value = input(inputs, name)?;
    value.as_f64().ok_or_else(|| EvaluatorError::InvalidInput {
        input: name.to_string(),
        expected: "a number",
        actual: describe(value),
    })
}

/// Short description of a JSON value's type for error messages
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

/// Build a single-metric score map
pub fn score(metric: &str, value: f64) -> RowScores {
    let mut scores = RowScores::new();
    scores.insert(metric.to_string(), value);
    scores
}
