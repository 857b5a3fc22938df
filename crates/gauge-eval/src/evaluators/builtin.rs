//! Built-in evaluators
//!
//! Generic scorers that suites declare by `type`. Domain-specific scoring
//! lives in the system under test: datasets record its output next to the
//! expected value and these evaluators compare the two.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Evaluator, EvaluatorError, RowInputs, RowScores, describe, input, number_input, score};

/// Declarative evaluator definition as written in a suite file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluatorSpec {
    /// `actual` equals `expected`
    ExactMatch {
        #[serde(default = "default_match_metric")]
        metric: String,
    },

    /// `actual` is within `tolerance` of `expected`
    NumericMatch {
        #[serde(default)]
        tolerance: f64,
        #[serde(default = "default_match_metric")]
        metric: String,
    },

    /// Fraction of `expected_fields` present in `response_data`
    FieldsPresent {
        #[serde(default = "default_completeness_metric")]
        metric: String,
    },

    /// Fraction of declared fields in `response_data` with the declared type
    FieldTypes {
        types: BTreeMap<String, JsonType>,
        #[serde(default = "default_type_metric")]
        metric: String,
    },

    /// 1.0 within `target_ms`, decaying as `target_ms / response_time_ms` beyond it
    ResponseTime {
        #[serde(default = "default_target_ms")]
        target_ms: f64,
        #[serde(default = "default_response_time_metric")]
        metric: String,
    },
}

fn default_match_metric() -> String {
    "accuracy".to_string()
}

fn default_completeness_metric() -> String {
    "completeness".to_string()
}

fn default_type_metric() -> String {
    "type_accuracy".to_string()
}

fn default_response_time_metric() -> String {
    "response_time_score".to_string()
}

fn default_target_ms() -> f64 {
    1000.0
}

impl EvaluatorSpec {
    /// Name of the metric this evaluator emits
    pub fn metric(&self) -> &str {
        match self {
            EvaluatorSpec::ExactMatch { metric }
            | EvaluatorSpec::NumericMatch { metric, .. }
            | EvaluatorSpec::FieldsPresent { metric }
            | EvaluatorSpec::FieldTypes { metric, .. }
            | EvaluatorSpec::ResponseTime { metric, .. } => metric,
        }
    }

    /// Validate the definition and build the evaluator
    pub fn build(&self) -> Result<Arc<dyn Evaluator>, String> {
        if self.metric().trim().is_empty() {
            return Err("metric name must not be empty".to_string());
        }

        let evaluator: Arc<dyn Evaluator> = match self {
            EvaluatorSpec::ExactMatch { metric } => Arc::new(ExactMatchEvaluator::new(metric)),
            EvaluatorSpec::NumericMatch { tolerance, metric } => {
                if !tolerance.is_finite() || *tolerance < 0.0 {
                    return Err(format!("tolerance must be a non-negative number, got {tolerance}"));
                }
                Arc::new(NumericMatchEvaluator::new(metric, *tolerance))
            }
            EvaluatorSpec::FieldsPresent { metric } => Arc::new(FieldsPresentEvaluator::new(metric)),
            EvaluatorSpec::FieldTypes { types, metric } => {
                if types.is_empty() {
                    return Err("types must declare at least one field".to_string());
                }
                Arc::new(FieldTypesEvaluator::new(metric, types.clone()))
            }
            EvaluatorSpec::ResponseTime { target_ms, metric } => {
                if !target_ms.is_finite() || *target_ms <= 0.0 {
                    return Err(format!("target_ms must be positive, got {target_ms}"));
                }
                Arc::new(ResponseTimeEvaluator::new(metric, *target_ms))
            }
        };
        Ok(evaluator)
    }
}

/// JSON value type names accepted by [`FieldTypesEvaluator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl JsonType {
    /// Check whether `value` has this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Number => value.is_number(),
            JsonType::Integer => value.is_i64() || value.is_u64(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Array => value.is_array(),
            JsonType::Object => value.is_object(),
            JsonType::Null => value.is_null(),
        }
    }
}

/// Compare two JSON values, treating numbers by numeric value
#[allow(clippy::float_cmp)]
fn values_match(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => actual == expected,
    }
}

fn as_score(passed: bool) -> f64 {
    if passed { 1.0 } else { 0.0 }
}

/// Scores 1.0 when `actual` equals `expected`
#[derive(Debug, Clone)]
pub struct ExactMatchEvaluator {
    metric: String,
}

impl ExactMatchEvaluator {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
        }
    }
}

impl Evaluator for ExactMatchEvaluator {
    fn required_inputs(&self) -> &[&'static str] {
        &["actual", "expected"]
    }

    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
        let actual = input(inputs, "actual")?;
        let expected = input(inputs, "expected")?;
        Ok(score(&self.metric, as_score(values_match(actual, expected))))
    }
}

/// Scores 1.0 when numeric `actual` is within `tolerance` of `expected`
#[derive(Debug, Clone)]
pub struct NumericMatchEvaluator {
    metric: String,
    tolerance: f64,
}

impl NumericMatchEvaluator {
    pub fn new(metric: impl Into<String>, tolerance: f64) -> Self {
        Self {
            metric: metric.into(),
            tolerance,
        }
    }
}

impl Evaluator for NumericMatchEvaluator {
    fn required_inputs(&self) -> &[&'static str] {
        &["actual", "expected"]
    }

    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
        let actual = number_input(inputs, "actual")?;
        let expected = number_input(inputs, "expected")?;
        let within = (actual - expected).abs() <= self.tolerance;
        Ok(score(&self.metric, as_score(within)))
    }
}

/// Fraction of `expected_fields` present (and non-null) in `response_data`
#[derive(Debug, Clone)]
pub struct FieldsPresentEvaluator {
    metric: String,
}

impl FieldsPresentEvaluator {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
        }
    }
}

impl Evaluator for FieldsPresentEvaluator {
    fn required_inputs(&self) -> &[&'static str] {
        &["response_data", "expected_fields"]
    }

    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
        let response = input(inputs, "response_data")?;
        let expected = input(inputs, "expected_fields")?;

        let invalid_fields = || EvaluatorError::InvalidInput {
            input: "expected_fields".to_string(),
            expected: "an array of strings",
            actual: describe(expected),
        };
        let fields = expected
            .as_array()
            .ok_or_else(invalid_fields)?
            .iter()
            .map(|field| field.as_str().ok_or_else(invalid_fields))
            .collect::<Result<Vec<_>, _>>()?;

        if fields.is_empty() {
            return Ok(score(&self.metric, 1.0));
        }

        let present = match response.as_object() {
            Some(object) => fields
                .iter()
                .filter(|field| object.get(**field).is_some_and(|v| !v.is_null()))
                .count(),
            None => 0,
        };

        Ok(score(&self.metric, present as f64 / fields.len() as f64))
    }
}

/// Fraction of declared fields in `response_data` that carry the declared type
#[derive(Debug, Clone)]
pub struct FieldTypesEvaluator {
    metric: String,
    types: BTreeMap<String, JsonType>,
}

impl FieldTypesEvaluator {
    pub fn new(metric: impl Into<String>, types: BTreeMap<String, JsonType>) -> Self {
        Self {
            metric: metric.into(),
            types,
        }
    }
}

impl Evaluator for FieldTypesEvaluator {
    fn required_inputs(&self) -> &[&'static str] {
        &["response_data"]
    }

    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
        let response = input(inputs, "response_data")?;
        if self.types.is_empty() {
            return Ok(score(&self.metric, 1.0));
        }

        let matching = match response.as_object() {
            Some(object) => self
                .types
                .iter()
                .filter(|(field, ty)| object.get(field.as_str()).is_some_and(|v| ty.matches(v)))
                .count(),
            None => 0,
        };

        Ok(score(
            &self.metric,
            matching as f64 / self.types.len() as f64,
        ))
    }
}

/// Latency score against a target response time
#[derive(Debug, Clone)]
pub struct ResponseTimeEvaluator {
    metric: String,
    target_ms: f64,
}

impl ResponseTimeEvaluator {
    pub fn new(metric: impl Into<String>, target_ms: f64) -> Self {
        Self {
            metric: metric.into(),
            target_ms,
        }
    }
}

impl Evaluator for ResponseTimeEvaluator {
    fn required_inputs(&self) -> &[&'static str] {
        &["response_time_ms"]
    }

    fn evaluate(&self, inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
        let elapsed = number_input(inputs, "response_time_ms")?;
        if elapsed < 0.0 {
            return Err(EvaluatorError::InvalidInput {
                input: "response_time_ms".to_string(),
                expected: "a non-negative number",
                actual: elapsed.to_string(),
            });
        }

        let value = if elapsed <= self.target_ms {
            1.0
        } else {
            self.target_ms / elapsed
        };
        Ok(score(&self.metric, value))
    }
}
