//! Dotted metric keys

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a dotted metric key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricKeyError {
    #[error("metric key '{0}' must have the form <evaluator>.<metric>")]
    Malformed(String),
}

/// Address of a metric inside a result bundle
///
/// On the wire this is `"<evaluator>.<metric>"`. The split happens at the
/// first dot, so metric names may contain dots themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetricKey {
    evaluator: String,
    metric: String,
}

impl MetricKey {
    /// Create a key from its parts
    pub fn new(evaluator: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            evaluator: evaluator.into(),
            metric: metric.into(),
        }
    }

    /// Parse a dotted key
    pub fn parse(raw: &str) -> Result<Self, MetricKeyError> {
        match raw.split_once('.') {
            Some((evaluator, metric)) if !evaluator.is_empty() && !metric.is_empty() => {
                Ok(Self::new(evaluator, metric))
            }
            _ => Err(MetricKeyError::Malformed(raw.to_string())),
        }
    }

    /// Name of the evaluator that emitted the metric
    pub fn evaluator(&self) -> &str {
        &self.evaluator
    }

    /// Metric name within the evaluator
    pub fn metric(&self) -> &str {
        &self.metric
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.evaluator, self.metric)
    }
}

impl FromStr for MetricKey {
    type Err = MetricKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MetricKey {
    type Error = MetricKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MetricKey> for String {
    fn from(key: MetricKey) -> Self {
        key.to_string()
    }
}
