//! Error types for the evaluation engine
//!
//! Per-group failures ([`RunFailure`]) are values the controller inspects,
//! never errors that abort a run. Only [`ControllerError`] escalates to a
//! process-level failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::metrics::MetricKeyError;

/// Tagged failure of a single evaluation group
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunFailure {
    /// The group's dataset file does not exist
    #[error("dataset for group '{group}' not found: {}", path.display())]
    DataNotFound { group: String, path: PathBuf },

    /// The batch service or one of the group's evaluators failed
    #[error("evaluation of group '{group}' failed: {cause}")]
    EvaluationError { group: String, cause: String },
}

impl RunFailure {
    /// Name of the group that failed
    pub fn group(&self) -> &str {
        match self {
            RunFailure::DataNotFound { group, .. } | RunFailure::EvaluationError { group, .. } => {
                group
            }
        }
    }

    /// Stable identifier of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            RunFailure::DataNotFound { .. } => "data_not_found",
            RunFailure::EvaluationError { .. } => "evaluation_error",
        }
    }
}

/// Errors that end a whole run
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Every group failed before producing a result
    #[error("no evaluations could be run ({attempted} group(s) attempted)")]
    NoEvaluationsRan { attempted: usize },

    #[error("failed to serialize summary")]
    SummarySerialize(#[from] serde_json::Error),

    #[error("failed to write summary to {}", path.display())]
    SummaryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading or validating a suite
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read suite file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse suite file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("duplicate group name '{0}'")]
    DuplicateGroup(String),

    #[error("suite has no group named '{0}'")]
    UnknownGroup(String),

    #[error("group '{group}' declares no evaluators")]
    NoEvaluators { group: String },

    #[error("group '{group}' declares evaluator '{evaluator}' more than once")]
    DuplicateEvaluator { group: String, evaluator: String },

    #[error("group '{group}': evaluator '{evaluator}' has no column mapping for input '{input}'")]
    MissingInput {
        group: String,
        evaluator: String,
        input: String,
    },

    #[error("group '{group}': column mapping refers to undeclared evaluator '{evaluator}'")]
    UnknownEvaluator { group: String, evaluator: String },

    #[error(
        "group '{group}': input '{input}' uses invalid column expression '{expr}' (expected ${{data.<column>}})"
    )]
    InvalidColumnExpr {
        group: String,
        input: String,
        expr: String,
    },

    #[error("group '{group}': {source}")]
    InvalidMetricKey {
        group: String,
        #[source]
        source: MetricKeyError,
    },

    #[error("group '{group}': threshold refers to undeclared evaluator '{evaluator}'")]
    UnknownThresholdEvaluator { group: String, evaluator: String },

    #[error("group '{group}' declares no threshold conditions")]
    EmptyRule { group: String },

    #[error("group '{group}': more than one threshold condition is reported as '{label}'")]
    DuplicateLabel { group: String, label: String },

    #[error("group '{group}': threshold on '{metric}' has non-finite bound {value}")]
    InvalidBound {
        group: String,
        metric: String,
        value: f64,
    },

    #[error("group '{group}': evaluator '{evaluator}' is misconfigured: {message}")]
    InvalidEvaluator {
        group: String,
        evaluator: String,
        message: String,
    },
}

/// Render an error with its full source chain on one line
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_failure_accessors() {
        let failure = RunFailure::DataNotFound {
            group: "api".to_string(),
            path: PathBuf::from("data/api_tests.jsonl"),
        };
        assert_eq!(failure.group(), "api");
        assert_eq!(failure.kind(), "data_not_found");
        assert!(failure.to_string().contains("data/api_tests.jsonl"));
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let error = ControllerError::SummaryWrite {
            path: PathBuf::from("results/summary.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        };
        let rendered = error_chain(&error);
        assert!(rendered.starts_with("failed to write summary"));
        assert!(rendered.ends_with("read-only"));
    }
}
