//! Evaluation runner
//!
//! Runs one group through the batch service and turns every expected
//! failure into a tagged [`RunFailure`].

use std::sync::Arc;

use crate::batch::{BatchError, BatchRequest, BatchService, LocalBatchService};
use crate::error::{RunFailure, error_chain};
use crate::metrics::ResultBundle;
use crate::suite::EvaluationGroup;

/// Outcome of one group, keyed by group name
pub type GroupOutcome = (String, Result<ResultBundle, RunFailure>);

/// Runs evaluation groups against their datasets
#[derive(Clone)]
pub struct EvaluationRunner {
    service: Arc<dyn BatchService>,
}

impl EvaluationRunner {
    /// Create a runner backed by `service`
    pub fn new(service: Arc<dyn BatchService>) -> Self {
        Self { service }
    }

    /// Create a runner backed by the in-process batch service
    pub fn local() -> Self {
        Self::new(Arc::new(LocalBatchService::new()))
    }

    /// Evaluate every evaluator of `group` in one pass over its dataset
    ///
    /// The raw bundle is written to the group's output path as a side
    /// effect.
    pub async fn run(&self, group: &EvaluationGroup) -> Result<ResultBundle, RunFailure> {
        tracing::info!(
            group = %group.name,
            dataset = %group.dataset_path.display(),
            evaluators = group.evaluators.len(),
            "Running evaluation group"
        );

        let request = BatchRequest {
            dataset: &group.dataset_path,
            evaluators: &group.evaluators,
            evaluator_config: &group.column_mapping,
            output_path: &group.result_output_path,
        };

        match self.service.evaluate(request).await {
            Ok(bundle) => {
                tracing::info!(
                    group = %group.name,
                    rows = bundle.row_count(),
                    metrics = bundle.metrics.len(),
                    output = %group.result_output_path.display(),
                    "Group evaluated"
                );
                Ok(bundle)
            }
            Err(BatchError::DatasetNotFound(path)) => {
                tracing::warn!(group = %group.name, path = %path.display(), "Dataset not found");
                Err(RunFailure::DataNotFound {
                    group: group.name.clone(),
                    path,
                })
            }
            Err(e) => {
                let cause = error_chain(&e);
                tracing::error!(group = %group.name, error = %cause, "Group evaluation failed");
                Err(RunFailure::EvaluationError {
                    group: group.name.clone(),
                    cause,
                })
            }
        }
    }

    /// Run `group` and pair the result with its name
    pub async fn run_outcome(&self, group: &EvaluationGroup) -> GroupOutcome {
        (group.name.clone(), self.run(group).await)
    }
}

impl std::fmt::Debug for EvaluationRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationRunner").finish_non_exhaustive()
    }
}
