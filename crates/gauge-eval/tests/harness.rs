//! End-to-end tests for the evaluation harness
//!
//! Suites are loaded from YAML and run through the controller, either with
//! a scripted batch service that returns fixed metrics or with the local
//! service over real datasets in a temporary directory.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gauge_eval::batch::{BatchError, BatchRequest, BatchService};
use gauge_eval::{
    ControllerError, EvaluationRunner, OverallStatus, ResultBundle, RunController, Status, Suite,
    SuiteLoader, Summary, exit_code,
};
use tempfile::TempDir;

const SUITE: &str = r#"
groups:
  - name: trust_score
    dataset: data/trust_score_tests.jsonl
    evaluators:
      - name: trust_score
        type: numeric_match
        metric: trust_score_accuracy
        column_mapping:
          actual: "${data.computed_score}"
          expected: "${data.expected_score}"
    threshold:
      - metric: trust_score.trust_score_accuracy
        value: 0.95
        label: accuracy

  - name: invitation
    dataset: data/invitation_tests.jsonl
    evaluators:
      - name: invitation
        type: exact_match
        metric: invitation_logic_correct
        column_mapping:
          actual: "${data.eligible}"
          expected: "${data.expected_eligible}"
    threshold:
      - metric: invitation.invitation_logic_correct
        value: 0.98
        label: accuracy

  - name: api
    dataset: data/api_tests.jsonl
    evaluators:
      - name: api_completeness
        type: fields_present
        metric: api_completeness
        column_mapping:
          response_data: "${data.response_data}"
          expected_fields: "${data.expected_fields}"
      - name: data_types
        type: field_types
        metric: data_type_accuracy
        types:
          id: string
          score: number
        column_mapping:
          response_data: "${data.response_data}"
      - name: response_time
        type: response_time
        target_ms: 1000
        metric: response_time_score
        column_mapping:
          response_time_ms: "${data.response_time_ms}"
    threshold:
      - metric: api_completeness.api_completeness
        value: 0.95
        label: completeness
      - metric: data_types.data_type_accuracy
        op: "=="
        value: 1.0
        label: type_accuracy
      - metric: response_time.response_time_score
        value: 0.8
        label: response_time
"#;

/// Batch service answering with fixed metrics per dataset file name
struct ScriptedService {
    metrics: BTreeMap<String, Vec<(&'static str, f64)>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn new(entries: &[(&str, Vec<(&'static str, f64)>)]) -> Arc<Self> {
        Arc::new(Self {
            metrics: entries
                .iter()
                .map(|(file, metrics)| (file.to_string(), metrics.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BatchService for ScriptedService {
    async fn evaluate(&self, request: BatchRequest<'_>) -> Result<ResultBundle, BatchError> {
        let file = request
            .dataset
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        self.calls.lock().unwrap().push(file.clone());

        match self.metrics.get(&file) {
            Some(metrics) => Ok(ResultBundle::from_metrics(metrics.iter().copied())),
            None => Err(BatchError::DatasetNotFound(request.dataset.to_path_buf())),
        }
    }
}

fn suite(base_dir: &Path) -> Suite {
    SuiteLoader::from_yaml_str(SUITE, base_dir).unwrap()
}

async fn run_scripted(
    service: Arc<ScriptedService>,
    summary_path: &Path,
) -> (Result<Summary, ControllerError>, Suite) {
    let suite = suite(Path::new("/virtual/evaluation"));
    let controller = RunController::new(EvaluationRunner::new(service), summary_path);
    (controller.execute(&suite.groups).await, suite)
}

fn all_groups_ok() -> Vec<(&'static str, Vec<(&'static str, f64)>)> {
    vec![
        (
            "trust_score_tests.jsonl",
            vec![("trust_score.trust_score_accuracy", 0.97)],
        ),
        (
            "invitation_tests.jsonl",
            vec![("invitation.invitation_logic_correct", 0.90)],
        ),
        (
            "api_tests.jsonl",
            vec![
                ("api_completeness.api_completeness", 0.96),
                ("data_types.data_type_accuracy", 1.0),
                ("response_time.response_time_score", 0.75),
            ],
        ),
    ]
}

#[tokio::test]
async fn test_threshold_examples() {
    let dir = TempDir::new().unwrap();
    let summary_path = dir.path().join("summary.json");

    let (result, _) = run_scripted(ScriptedService::new(&all_groups_ok()), &summary_path).await;
    let summary = result.unwrap();

    // 0.97 >= 0.95
    assert_eq!(summary.evaluations.get("trust_score").unwrap().status, Status::Pass);
    // 0.90 < 0.98
    assert_eq!(summary.evaluations.get("invitation").unwrap().status, Status::Fail);
    // every condition must hold: response time 0.75 < 0.80
    let api = summary.evaluations.get("api").unwrap();
    assert_eq!(api.status, Status::Fail);
    let labels: Vec<_> = api.metrics.keys().cloned().collect();
    assert_eq!(labels, vec!["completeness", "type_accuracy", "response_time"]);

    assert_eq!(summary.overall_status, OverallStatus::Fail);
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_all_groups_missing_data() {
    let dir = TempDir::new().unwrap();
    let summary_path = dir.path().join("summary.json");
    let service = ScriptedService::new(&[]);

    let (result, _) = run_scripted(service.clone(), &summary_path).await;

    assert!(matches!(
        result,
        Err(ControllerError::NoEvaluationsRan { attempted: 3 })
    ));
    assert_eq!(exit_code(&result), 1);
    assert!(!summary_path.exists());
    assert_eq!(service.calls.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_only_ran_groups_count() {
    let dir = TempDir::new().unwrap();
    let summary_path = dir.path().join("summary.json");
    let service = ScriptedService::new(&[(
        "trust_score_tests.jsonl",
        vec![("trust_score.trust_score_accuracy", 0.97)],
    )]);

    let (result, _) = run_scripted(service.clone(), &summary_path).await;
    let summary = result.unwrap();

    assert_eq!(summary.overall_status, OverallStatus::Pass);
    assert_eq!(exit_code(&Ok(summary.clone())), 0);
    let names: Vec<_> = summary.evaluations.keys().cloned().collect();
    assert_eq!(names, vec!["trust_score"]);
    let skipped: Vec<_> = summary.skipped.iter().map(|s| s.group.as_str()).collect();
    assert_eq!(skipped, vec!["invitation", "api"]);

    // later groups still ran after the earlier ones failed
    assert_eq!(
        *service.calls.lock().unwrap(),
        vec![
            "trust_score_tests.jsonl",
            "invitation_tests.jsonl",
            "api_tests.jsonl"
        ]
    );
    assert!(summary_path.exists());
}

#[tokio::test]
async fn test_missing_metric_fails_group() {
    let dir = TempDir::new().unwrap();
    let service = ScriptedService::new(&[(
        "api_tests.jsonl",
        vec![
            ("api_completeness.api_completeness", 1.0),
            ("response_time.response_time_score", 1.0),
        ],
    )]);

    let (result, _) = run_scripted(service, &dir.path().join("summary.json")).await;
    let api = result.unwrap().evaluations.get("api").cloned().unwrap();

    assert_eq!(api.metrics.get("type_accuracy"), Some(&0.0));
    assert_eq!(api.status, Status::Fail);
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.json");

    let (first, _) = run_scripted(ScriptedService::new(&all_groups_ok()), &path).await;
    let (second, _) = run_scripted(ScriptedService::new(&all_groups_ok()), &path).await;
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!(first.evaluations, second.evaluations);
    assert_eq!(first.overall_status, second.overall_status);
}

fn write_datasets(dir: &Path) {
    let data = dir.join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("trust_score_tests.jsonl"),
        "{\"computed_score\": 92, \"expected_score\": 92}\n{\"computed_score\": 35, \"expected_score\": 35}\n",
    )
    .unwrap();
    std::fs::write(
        data.join("api_tests.jsonl"),
        concat!(
            "{\"response_data\": {\"id\": \"a\", \"score\": 0.5}, \"expected_fields\": [\"id\", \"score\"], \"response_time_ms\": 200}\n",
            "{\"response_data\": {\"id\": \"b\", \"score\": 1}, \"expected_fields\": [\"id\"], \"response_time_ms\": 1250}\n",
        ),
    )
    .unwrap();
}

#[tokio::test]
async fn test_local_run_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    write_datasets(dir.path());
    let suite = suite(dir.path());
    let controller = RunController::new(EvaluationRunner::local(), &suite.summary_path);

    let summary = controller.execute(&suite.groups).await.unwrap();

    // invitation has no dataset and is skipped
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].reason, "data_not_found");
    assert_eq!(summary.overall_status, OverallStatus::Pass);

    let api = summary.evaluations.get("api").unwrap();
    assert_eq!(api.metrics.get("completeness"), Some(&1.0));
    // 200ms scores 1.0, 1250ms scores 1000 / 1250
    let response_time = *api.metrics.get("response_time").unwrap();
    assert!((response_time - 0.9).abs() < 1e-9);

    let results = dir.path().join("results");
    assert!(results.join("trust_score_results.json").exists());
    assert!(results.join("api_results.json").exists());
    assert!(!results.join("invitation_results.json").exists());

    let raw: ResultBundle = serde_json::from_str(
        &std::fs::read_to_string(results.join("api_results.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw.row_count(), 2);

    let persisted: Summary =
        serde_json::from_str(&std::fs::read_to_string(&suite.summary_path).unwrap()).unwrap();
    assert_eq!(persisted, summary);
}

#[tokio::test]
async fn test_summary_overwritten_on_rerun() {
    let dir = TempDir::new().unwrap();
    write_datasets(dir.path());
    let suite = suite(dir.path());
    let controller = RunController::new(EvaluationRunner::local(), &suite.summary_path);

    controller.execute(&suite.groups).await.unwrap();

    // Break the trust score dataset so the second run fails that group
    std::fs::write(
        dir.path().join("data/trust_score_tests.jsonl"),
        "{\"computed_score\": 10, \"expected_score\": 92}\n",
    )
    .unwrap();
    let second = controller.execute(&suite.groups).await.unwrap();

    let persisted: Summary =
        serde_json::from_str(&std::fs::read_to_string(&suite.summary_path).unwrap()).unwrap();
    assert_eq!(persisted.overall_status, OverallStatus::Fail);
    assert_eq!(persisted, second);
}

#[tokio::test]
async fn test_malformed_dataset_is_evaluation_error() {
    let dir = TempDir::new().unwrap();
    write_datasets(dir.path());
    std::fs::write(
        dir.path().join("data/api_tests.jsonl"),
        "{\"response_data\": {}, \"expected_fields\": [], \"response_time_ms\": 10}\nnot json\n",
    )
    .unwrap();
    let suite = suite(dir.path());
    let controller = RunController::without_summary(EvaluationRunner::local());

    let summary = controller.execute(&suite.groups).await.unwrap();

    let api = summary
        .skipped
        .iter()
        .find(|s| s.group == "api")
        .unwrap();
    assert_eq!(api.reason, "evaluation_error");
    assert!(api.detail.contains("line 2"));
    assert!(!dir.path().join("results/api_results.json").exists());
}
