//! Threshold rule definitions

use serde::{Deserialize, Serialize};

use crate::metrics::MetricKey;

/// Comparison applied between a metric and its bound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    /// `metric >= bound`
    #[default]
    #[serde(rename = ">=", alias = "gte")]
    AtLeast,
    /// `metric > bound`
    #[serde(rename = ">", alias = "gt")]
    Above,
    /// `metric <= bound`
    #[serde(rename = "<=", alias = "lte")]
    AtMost,
    /// `metric < bound`
    #[serde(rename = "<", alias = "lt")]
    Below,
    /// `metric == bound`, exact
    #[serde(rename = "==", alias = "eq")]
    Equals,
}

impl Comparator {
    /// Check whether `value` satisfies the comparison against `bound`
    #[allow(clippy::float_cmp)]
    pub fn holds(self, value: f64, bound: f64) -> bool {
        match self {
            Comparator::AtLeast => value >= bound,
            Comparator::Above => value > bound,
            Comparator::AtMost => value <= bound,
            Comparator::Below => value < bound,
            Comparator::Equals => value == bound,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::AtLeast => ">=",
            Comparator::Above => ">",
            Comparator::AtMost => "<=",
            Comparator::Below => "<",
            Comparator::Equals => "==",
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `metric <op> bound` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Metric the condition reads
    pub metric: MetricKey,

    /// Comparison operator (default: `>=`)
    #[serde(default, rename = "op")]
    pub comparator: Comparator,

    /// Bound the metric is compared against
    #[serde(rename = "value")]
    pub bound: f64,

    /// Name used for the metric in the summary (default: the metric key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Condition {
    /// Create a condition
    pub fn new(metric: MetricKey, comparator: Comparator, bound: f64) -> Self {
        Self {
            metric,
            comparator,
            bound,
            label: None,
        }
    }

    /// `metric >= bound`
    pub fn at_least(metric: MetricKey, bound: f64) -> Self {
        Self::new(metric, Comparator::AtLeast, bound)
    }

    /// `metric == bound`
    pub fn equals(metric: MetricKey, bound: f64) -> Self {
        Self::new(metric, Comparator::Equals, bound)
    }

    /// Set the summary label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if set, otherwise the dotted metric key
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.metric.to_string())
    }

    /// Check the condition against a metric value
    pub fn is_met(&self, value: f64) -> bool {
        self.comparator.holds(value, self.bound)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.metric, self.comparator, self.bound)
    }
}

/// Conditions that must all hold for a group to pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdRule {
    pub conditions: Vec<Condition>,
}

impl ThresholdRule {
    /// Rule with all of the given conditions
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Rule with a single condition
    pub fn single(condition: Condition) -> Self {
        Self::all(vec![condition])
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Metric keys the rule reads, deduplicated, in declaration order
    pub fn metric_keys(&self) -> Vec<MetricKey> {
        let mut keys: Vec<MetricKey> = Vec::new();
        for condition in &self.conditions {
            if !keys.contains(&condition.metric) {
                keys.push(condition.metric.clone());
            }
        }
        keys
    }
}
