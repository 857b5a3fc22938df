//! Run controller
//!
//! Sequences groups in declared order, collects their outcomes, aggregates
//! and persists the summary, and maps the verdict to a process exit code.

use std::path::{Path, PathBuf};

use super::{EvaluationRunner, GroupOutcome, HarnessConfig};
use crate::error::{ControllerError, error_chain};
use crate::report::{Summary, SummaryAggregator, generate_table};
use crate::suite::{EvaluationGroup, Suite};

/// Callback for progress updates during a run
pub type ProgressCallback = Box<dyn Fn(RunProgress) + Send + Sync>;

/// Progress update during a run
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Current group index (0-based)
    pub current: usize,
    /// Total number of groups
    pub total: usize,
    /// Current group name
    pub group: String,
    /// Status message
    pub message: String,
}

/// Drives a full evaluation run
pub struct RunController {
    runner: EvaluationRunner,

    /// Where the summary is written; `None` skips persistence
    summary_path: Option<PathBuf>,

    progress_callback: Option<ProgressCallback>,
}

impl RunController {
    /// Create a controller that writes the summary to `summary_path`
    pub fn new(runner: EvaluationRunner, summary_path: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            summary_path: Some(summary_path.into()),
            progress_callback: None,
        }
    }

    /// Create a controller that never writes a summary file
    pub fn without_summary(runner: EvaluationRunner) -> Self {
        Self {
            runner,
            summary_path: None,
            progress_callback: None,
        }
    }

    /// Create a local controller for `suite` honoring `config`
    pub fn from_config(config: &HarnessConfig, suite: &Suite) -> Self {
        let runner = EvaluationRunner::local();
        if config.save_summary {
            Self::new(runner, config.effective_summary_path(&suite.summary_path))
        } else {
            Self::without_summary(runner)
        }
    }

    /// Set progress callback
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    pub fn summary_path(&self) -> Option<&Path> {
        self.summary_path.as_deref()
    }

    /// Run every group in order; a failing group never stops the next one
    pub async fn run_groups(&self, groups: &[EvaluationGroup]) -> Vec<GroupOutcome> {
        let mut outcomes = Vec::with_capacity(groups.len());

        for (index, group) in groups.iter().enumerate() {
            self.emit_progress(RunProgress {
                current: index,
                total: groups.len(),
                group: group.name.clone(),
                message: format!("Evaluating {}", group.dataset_path.display()),
            });

            outcomes.push(self.runner.run_outcome(group).await);
        }

        outcomes
    }

    /// Run, aggregate and persist
    ///
    /// Fails with [`ControllerError::NoEvaluationsRan`] when no group
    /// produced results; no summary is written in that case.
    pub async fn execute(&self, groups: &[EvaluationGroup]) -> Result<Summary, ControllerError> {
        let outcomes = self.run_groups(groups).await;

        if outcomes.iter().all(|(_, outcome)| outcome.is_err()) {
            return Err(ControllerError::NoEvaluationsRan {
                attempted: outcomes.len(),
            });
        }

        let summary = SummaryAggregator::new(groups).aggregate(outcomes);
        tracing::info!(
            overall_status = %summary.overall_status,
            passed = summary.passed(),
            failed = summary.failed(),
            skipped = summary.skipped.len(),
            "Run complete"
        );

        if let Some(path) = &self.summary_path {
            SummaryAggregator::persist(&summary, path).await?;
        }

        Ok(summary)
    }

    /// Run all groups, print the digest and return the process exit code
    pub async fn run_all(&self, groups: &[EvaluationGroup]) -> i32 {
        let result = self.execute(groups).await;
        match &result {
            Ok(summary) => println!("{}", generate_table(summary)),
            Err(ControllerError::NoEvaluationsRan { .. }) => {
                println!("No evaluations could be run");
            }
            Err(_) => {}
        }
        exit_code(&result)
    }

    fn emit_progress(&self, progress: RunProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

/// Exit code for a run result: 0 only when the summary passed
pub fn exit_code(result: &Result<Summary, ControllerError>) -> i32 {
    match result {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            tracing::error!(error = %error_chain(e), "Evaluation run failed");
            1
        }
    }
}
