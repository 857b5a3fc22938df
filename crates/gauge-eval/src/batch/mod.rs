//! Batch execution
//!
//! The batch service runs every evaluator of a group over each dataset row
//! and summarizes per-row scores into `evaluator.metric` keys. The engine
//! only depends on the [`BatchService`] trait; [`LocalBatchService`] is the
//! in-process implementation.

mod dataset;
mod mapping;
mod service;

use std::path::PathBuf;

use thiserror::Error;

use crate::evaluators::EvaluatorError;

pub use dataset::{Dataset, Row};
pub use mapping::{ColumnExprError, ColumnMapping, ColumnRef};
pub use service::{BatchRequest, BatchService, LocalBatchService};

/// Errors raised by a batch evaluation
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("failed to read dataset {}", path.display())]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },

    #[error("evaluator '{evaluator}': line {line} has no column '{column}'")]
    MissingColumn {
        evaluator: String,
        line: usize,
        column: String,
    },

    #[error("evaluator '{evaluator}' failed at line {line}")]
    Evaluator {
        evaluator: String,
        line: usize,
        #[source]
        source: EvaluatorError,
    },

    #[error("failed to serialize results")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write results to {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
