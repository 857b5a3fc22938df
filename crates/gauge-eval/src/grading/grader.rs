//! Pass/fail grading of extracted metrics

use serde::{Deserialize, Serialize};

use super::{Condition, ThresholdRule};
use crate::metrics::{MISSING_METRIC_DEFAULT, MetricKey};
use crate::ordered::OrderedMap;

/// Verdict for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn is_pass(self) -> bool {
        matches!(self, Status::Pass)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies threshold rules to metric values
pub struct ThresholdGrader;

impl ThresholdGrader {
    /// Grade `metrics` against `rule`
    ///
    /// Every condition must hold. A metric missing from `metrics` is read as
    /// [`MISSING_METRIC_DEFAULT`], so it fails any positive lower bound.
    pub fn grade(metrics: &OrderedMap<MetricKey, f64>, rule: &ThresholdRule) -> Status {
        if Self::failing_conditions(metrics, rule).is_empty() {
            Status::Pass
        } else {
            Status::Fail
        }
    }

    /// Conditions of `rule` that `metrics` does not meet
    pub fn failing_conditions<'r>(
        metrics: &OrderedMap<MetricKey, f64>,
        rule: &'r ThresholdRule,
    ) -> Vec<&'r Condition> {
        rule.conditions
            .iter()
            .filter(|condition| {
                let value = metrics
                    .get(&condition.metric)
                    .copied()
                    .unwrap_or(MISSING_METRIC_DEFAULT);
                !condition.is_met(value)
            })
            .collect()
    }
}
