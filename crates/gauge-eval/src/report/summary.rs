//! Run summary and its aggregation
//!
//! The summary is the only durable artifact of a run. Groups appear in the
//! order they were invoked and metrics in the order their rule declares
//! them.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ControllerError, RunFailure};
use crate::grading::{Status, ThresholdGrader, ThresholdRule};
use crate::metrics::{MetricExtractor, MetricKey, ResultBundle};
use crate::ordered::OrderedMap;
use crate::runner::GroupOutcome;
use crate::suite::EvaluationGroup;

/// Verdict over every group that produced results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    Pass,
    Fail,
    /// No group produced results
    Unknown,
}

impl OverallStatus {
    /// `Unknown` when empty, `Pass` when every status passed, else `Fail`
    pub fn from_statuses(statuses: impl IntoIterator<Item = Status>) -> Self {
        let mut overall = OverallStatus::Unknown;
        for status in statuses {
            if !status.is_pass() {
                return OverallStatus::Fail;
            }
            overall = OverallStatus::Pass;
        }
        overall
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OverallStatus::Pass => "PASS",
            OverallStatus::Fail => "FAIL",
            OverallStatus::Unknown => "UNKNOWN",
        }
    }

    /// Process exit code: 0 only for `Pass`
    pub fn exit_code(self) -> i32 {
        match self {
            OverallStatus::Pass => 0,
            OverallStatus::Fail | OverallStatus::Unknown => 1,
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One group's entry in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Metric label → value
    pub metrics: OrderedMap<String, f64>,
    pub status: Status,
}

/// A group that could not run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedGroup {
    pub group: String,
    /// Failure class, e.g. `data_not_found`
    pub reason: String,
    pub detail: String,
}

impl From<&RunFailure> for SkippedGroup {
    fn from(failure: &RunFailure) -> Self {
        Self {
            group: failure.group().to_string(),
            reason: failure.kind().to_string(),
            detail: failure.to_string(),
        }
    }
}

/// Aggregated report of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub timestamp: DateTime<Utc>,
    pub evaluations: OrderedMap<String, GroupRecord>,
    pub overall_status: OverallStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedGroup>,
}

impl Summary {
    /// Number of groups that passed
    pub fn passed(&self) -> usize {
        self.evaluations
            .values()
            .filter(|record| record.status.is_pass())
            .count()
    }

    /// Number of groups that failed their thresholds
    pub fn failed(&self) -> usize {
        self.evaluations.len() - self.passed()
    }

    pub fn exit_code(&self) -> i32 {
        self.overall_status.exit_code()
    }
}

/// Graded result of one group, before it becomes a summary record
#[derive(Debug, Clone, PartialEq)]
pub struct GroupVerdict {
    pub group_name: String,
    pub extracted_metrics: OrderedMap<MetricKey, f64>,
    pub status: Status,
}

impl GroupVerdict {
    /// Summary record, naming each metric by its condition label
    pub fn into_record(self, rule: &ThresholdRule) -> GroupRecord {
        let metrics = self
            .extracted_metrics
            .into_iter()
            .map(|(key, value)| {
                let label = rule
                    .conditions
                    .iter()
                    .find(|c| c.metric == key)
                    .map(|c| c.display_name())
                    .unwrap_or_else(|| key.to_string());
                (label, value)
            })
            .collect();

        GroupRecord {
            metrics,
            status: self.status,
        }
    }
}

/// Merges group outcomes into a [`Summary`]
pub struct SummaryAggregator<'a> {
    groups: &'a [EvaluationGroup],
}

impl<'a> SummaryAggregator<'a> {
    /// Create an aggregator for the groups of a run
    pub fn new(groups: &'a [EvaluationGroup]) -> Self {
        Self { groups }
    }

    /// Extract and grade one group's bundle
    pub fn verdict(group: &EvaluationGroup, bundle: &ResultBundle) -> GroupVerdict {
        let extracted = MetricExtractor::extract(bundle, &group.metric_keys());
        let status = ThresholdGrader::grade(&extracted, &group.threshold);

        for condition in ThresholdGrader::failing_conditions(&extracted, &group.threshold) {
            tracing::info!(group = %group.name, condition = %condition, "Threshold not met");
        }

        GroupVerdict {
            group_name: group.name.clone(),
            extracted_metrics: extracted,
            status,
        }
    }

    /// Build the summary from outcomes in invocation order
    ///
    /// Failed groups are left out of `evaluations` and listed under
    /// `skipped`; they never affect the overall status.
    pub fn aggregate(&self, outcomes: Vec<GroupOutcome>) -> Summary {
        let mut evaluations = OrderedMap::new();
        let mut skipped = Vec::new();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(bundle) => {
                    let Some(group) = self.groups.iter().find(|g| g.name == name) else {
                        tracing::warn!(group = %name, "Result for unknown group ignored");
                        continue;
                    };
                    let verdict = Self::verdict(group, &bundle);
                    tracing::debug!(group = %name, status = %verdict.status, "Graded group");
                    evaluations.insert(name, verdict.into_record(&group.threshold));
                }
                Err(failure) => {
                    tracing::warn!(
                        group = %name,
                        reason = failure.kind(),
                        error = %failure,
                        "Group excluded from summary, run is degraded"
                    );
                    skipped.push(SkippedGroup::from(&failure));
                }
            }
        }

        let overall_status =
            OverallStatus::from_statuses(evaluations.values().map(|r: &GroupRecord| r.status));

        Summary {
            timestamp: Utc::now(),
            evaluations,
            overall_status,
            skipped,
        }
    }

    /// Write the summary as pretty JSON, replacing any previous file
    pub async fn persist(summary: &Summary, path: &Path) -> Result<(), ControllerError> {
        let json = serde_json::to_string_pretty(summary)?;
        let write_error = |source| ControllerError::SummaryWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(path, json).await.map_err(write_error)?;

        tracing::info!(path = %path.display(), "Saved evaluation summary");
        Ok(())
    }

    /// Read a persisted summary
    pub async fn load(path: &Path) -> Result<Summary> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read summary: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse summary: {:?}", path))
    }
}
