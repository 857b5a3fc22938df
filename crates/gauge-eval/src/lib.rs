//! Gauge evaluation engine
//!
//! Runs named groups of evaluators over labeled JSON-lines datasets, grades
//! the aggregated metrics against per-group threshold rules and reduces the
//! result to a single PASS/FAIL verdict suitable for gating a deployment.
//!
//! # Features
//!
//! - **Declarative suites**: groups, evaluators, column mappings and
//!   thresholds loaded from YAML or JSON and validated up front
//! - **Tagged failures**: a missing dataset or a failing evaluator takes out
//!   one group, never the run
//! - **Durable summary**: one JSON report per run, overwritten each time
//! - **Report Generation**: terminal digest, JSON and Markdown output
//!
//! # Example
//!
//! ```rust,ignore
//! use gauge_eval::{HarnessConfig, RunController, SuiteLoader};
//!
//! let config = HarnessConfig::default();
//! let suite = SuiteLoader::load(&config.suite_file)?;
//! let controller = RunController::from_config(&config, &suite);
//! let code = controller.run_all(&suite.groups).await;
//! std::process::exit(code);
//! ```

pub mod batch;
pub mod error;
pub mod evaluators;
pub mod grading;
pub mod metrics;
pub mod ordered;
pub mod report;
pub mod runner;
pub mod suite;

// Re-exports for convenience
pub use batch::{BatchService, LocalBatchService};
pub use error::{ConfigError, ControllerError, RunFailure};
pub use evaluators::{Evaluator, EvaluatorSpec};
pub use grading::{Comparator, Condition, Status, ThresholdGrader, ThresholdRule};
pub use metrics::{MetricExtractor, MetricKey, ResultBundle};
pub use ordered::OrderedMap;
pub use report::{OverallStatus, ReportFormat, Summary, SummaryAggregator, generate_report};
pub use runner::{EvaluationRunner, HarnessConfig, RunController, exit_code};
pub use suite::{EvaluationGroup, Suite, SuiteLoader};
