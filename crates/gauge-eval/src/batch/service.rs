//! Batch evaluation service

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{BatchError, ColumnMapping, Dataset};
use crate::evaluators::Evaluator;
use crate::metrics::{MetricKey, ResultBundle};
use crate::ordered::OrderedMap;

/// Everything needed to evaluate one group's dataset
#[derive(Debug, Clone, Copy)]
pub struct BatchRequest<'a> {
    /// Dataset file (JSON lines)
    pub dataset: &'a Path,

    /// Evaluators to run, in declaration order
    pub evaluators: &'a OrderedMap<String, Arc<dyn Evaluator>>,

    /// Column mapping per evaluator name
    pub evaluator_config: &'a BTreeMap<String, ColumnMapping>,

    /// Where the raw result bundle is written
    pub output_path: &'a Path,
}

/// Runs evaluators over a dataset and summarizes their scores
#[async_trait]
pub trait BatchService: Send + Sync {
    /// Evaluate every row with every evaluator, write the raw bundle to
    /// `request.output_path` and return it
    async fn evaluate(&self, request: BatchRequest<'_>) -> Result<ResultBundle, BatchError>;
}

/// In-process batch service
///
/// Every evaluator sees every row in one pass over the dataset. A metric's
/// value is the mean of the finite per-row scores emitted under it. Any
/// row-level error fails the whole batch.
#[derive(Debug, Clone, Default)]
pub struct LocalBatchService;

impl LocalBatchService {
    pub fn new() -> Self {
        Self
    }

    /// Run all evaluators over the dataset without writing output
    pub fn evaluate_dataset(
        dataset: &Dataset,
        evaluators: &OrderedMap<String, Arc<dyn Evaluator>>,
        evaluator_config: &BTreeMap<String, ColumnMapping>,
    ) -> Result<ResultBundle, BatchError> {
        let unmapped = ColumnMapping::new();
        let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        let mut rows = Vec::with_capacity(dataset.len());

        for (line, row) in dataset.rows() {
            let mut outputs = serde_json::Map::new();

            for (name, evaluator) in evaluators.iter() {
                let mapping = evaluator_config.get(name).unwrap_or(&unmapped);
                let inputs = mapping
                    .resolve(row)
                    .map_err(|column| BatchError::MissingColumn {
                        evaluator: name.clone(),
                        line,
                        column,
                    })?;

                let scores = evaluator
                    .evaluate(&inputs)
                    .map_err(|source| BatchError::Evaluator {
                        evaluator: name.clone(),
                        line,
                        source,
                    })?;

                for (metric, value) in scores {
                    let key = MetricKey::new(name.as_str(), metric).to_string();
                    if value.is_finite() {
                        let entry = totals.entry(key.clone()).or_insert((0.0, 0));
                        entry.0 += value;
                        entry.1 += 1;
                    }
                    outputs.insert(key, json!(value));
                }
            }

            rows.push(json!({
                "line": line,
                "inputs": Value::Object(row.clone()),
                "outputs": Value::Object(outputs),
            }));
        }

        let metrics = totals
            .into_iter()
            .map(|(key, (sum, count))| (key, sum / count as f64))
            .collect();

        Ok(ResultBundle::new(metrics, rows))
    }

    async fn write_output(path: &Path, bundle: &ResultBundle) -> Result<(), BatchError> {
        let json = serde_json::to_string_pretty(bundle)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| BatchError::OutputWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, json)
            .await
            .map_err(|source| BatchError::OutputWrite {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[async_trait]
impl BatchService for LocalBatchService {
    async fn evaluate(&self, request: BatchRequest<'_>) -> Result<ResultBundle, BatchError> {
        let dataset = Dataset::load(request.dataset).await?;
        tracing::debug!(
            dataset = %request.dataset.display(),
            rows = dataset.len(),
            evaluators = request.evaluators.len(),
            "Loaded dataset"
        );

        let bundle =
            Self::evaluate_dataset(&dataset, request.evaluators, request.evaluator_config)?;

        Self::write_output(request.output_path, &bundle).await?;
        tracing::debug!(output = %request.output_path.display(), "Wrote raw results");

        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ColumnRef;
    use crate::evaluators::{
        EvaluatorError, ExactMatchEvaluator, ResponseTimeEvaluator, RowInputs, RowScores,
    };
    use tempfile::TempDir;

    #[derive(Debug)]
    struct Exploding;

    impl Evaluator for Exploding {
        fn required_inputs(&self) -> &[&'static str] {
            &[]
        }

        fn evaluate(&self, _inputs: &RowInputs) -> Result<RowScores, EvaluatorError> {
            Err(EvaluatorError::Failed("boom".to_string()))
        }
    }

    fn invitation_setup() -> (
        OrderedMap<String, Arc<dyn Evaluator>>,
        BTreeMap<String, ColumnMapping>,
    ) {
        let mut evaluators: OrderedMap<String, Arc<dyn Evaluator>> = OrderedMap::new();
        evaluators.insert(
            "invitation".to_string(),
            Arc::new(ExactMatchEvaluator::new("invitation_logic_correct")),
        );

        let mut config = BTreeMap::new();
        config.insert(
            "invitation".to_string(),
            ColumnMapping::new()
                .with_input("actual", ColumnRef::column("eligible"))
                .with_input("expected", ColumnRef::column("expected_eligible")),
        );
        (evaluators, config)
    }

    #[test]
    fn test_metrics_are_row_means() {
        let dataset = Dataset::parse(
            "inline.jsonl",
            concat!(
                "{\"eligible\": true, \"expected_eligible\": true}\n",
                "{\"eligible\": false, \"expected_eligible\": true}\n",
                "{\"eligible\": false, \"expected_eligible\": false}\n",
                "{\"eligible\": true, \"expected_eligible\": true}\n",
            ),
        )
        .unwrap();
        let (evaluators, config) = invitation_setup();

        let bundle = LocalBatchService::evaluate_dataset(&dataset, &evaluators, &config).unwrap();

        assert_eq!(
            bundle.metrics.get("invitation.invitation_logic_correct"),
            Some(&0.75)
        );
        assert_eq!(bundle.row_count(), 4);
        assert_eq!(
            bundle.rows[1]["outputs"]["invitation.invitation_logic_correct"],
            json!(0.0)
        );
    }

    #[test]
    fn test_empty_dataset_emits_no_metrics() {
        let dataset = Dataset::parse("empty.jsonl", "").unwrap();
        let (evaluators, config) = invitation_setup();

        let bundle = LocalBatchService::evaluate_dataset(&dataset, &evaluators, &config).unwrap();
        assert!(bundle.metrics.is_empty());
    }

    #[test]
    fn test_missing_column_fails_batch() {
        let dataset = Dataset::parse("inline.jsonl", "{\"eligible\": true}\n").unwrap();
        let (evaluators, config) = invitation_setup();

        let err = LocalBatchService::evaluate_dataset(&dataset, &evaluators, &config).unwrap_err();
        assert!(matches!(
            err,
            BatchError::MissingColumn { ref column, line: 1, .. } if column == "expected_eligible"
        ));
    }

    #[test]
    fn test_evaluator_error_fails_whole_batch() {
        let dataset = Dataset::parse("inline.jsonl", "{\"response_time_ms\": 100}\n").unwrap();

        let mut evaluators: OrderedMap<String, Arc<dyn Evaluator>> = OrderedMap::new();
        evaluators.insert(
            "response_time".to_string(),
            Arc::new(ResponseTimeEvaluator::new("response_time_score", 1000.0)),
        );
        evaluators.insert("broken".to_string(), Arc::new(Exploding));

        let mut config = BTreeMap::new();
        config.insert(
            "response_time".to_string(),
            ColumnMapping::new().with_input("response_time_ms", ColumnRef::column("response_time_ms")),
        );

        let err = LocalBatchService::evaluate_dataset(&dataset, &evaluators, &config).unwrap_err();
        assert!(matches!(err, BatchError::Evaluator { ref evaluator, .. } if evaluator == "broken"));
    }

    #[tokio::test]
    async fn test_evaluate_writes_output() {
        let dir = TempDir::new().unwrap();
        let dataset_path = dir.path().join("invitation_tests.jsonl");
        tokio::fs::write(
            &dataset_path,
            "{\"eligible\": true, \"expected_eligible\": true}\n",
        )
        .await
        .unwrap();
        let output_path = dir.path().join("results").join("invitation_results.json");
        let (evaluators, config) = invitation_setup();

        let bundle = LocalBatchService::new()
            .evaluate(BatchRequest {
                dataset: &dataset_path,
                evaluators: &evaluators,
                evaluator_config: &config,
                output_path: &output_path,
            })
            .await
            .unwrap();

        let written: ResultBundle =
            serde_json::from_str(&tokio::fs::read_to_string(&output_path).await.unwrap()).unwrap();
        assert_eq!(written, bundle);
    }
}
