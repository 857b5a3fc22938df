//! On-disk suite format
//!
//! These types mirror the suite file one-to-one. Column expressions and
//! metric keys stay raw strings here so that the loader can report errors
//! with the group they belong to.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::evaluators::EvaluatorSpec;
use crate::grading::Comparator;

/// Top-level suite file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteFile {
    /// Directory for per-group raw results, relative to the suite file
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Summary location; defaults to `<results_dir>/summary.json`
    #[serde(default)]
    pub summary_path: Option<PathBuf>,

    /// Groups in run order
    pub groups: Vec<GroupDefinition>,
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

/// One evaluation group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// JSON-lines dataset
    pub dataset: PathBuf,

    /// Raw result file; defaults to `<results_dir>/<name>_results.json`
    #[serde(default)]
    pub output: Option<PathBuf>,

    pub evaluators: Vec<EvaluatorDefinition>,

    /// Conditions, all of which must hold
    #[serde(default)]
    pub threshold: Vec<ConditionDefinition>,
}

/// A named evaluator with its column mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorDefinition {
    pub name: String,

    /// Input parameter → `${data.<column>}`
    #[serde(default)]
    pub column_mapping: BTreeMap<String, String>,

    #[serde(flatten)]
    pub spec: EvaluatorSpec,
}

/// One threshold condition as written in the suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDefinition {
    /// Dotted `<evaluator>.<metric>` key
    pub metric: String,

    #[serde(default)]
    pub op: Comparator,

    pub value: f64,

    #[serde(default)]
    pub label: Option<String>,
}
