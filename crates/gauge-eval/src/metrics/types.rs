//! Result bundle produced by one group run

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Output of running one evaluation group
///
/// `metrics` uses the wire format emitted by the batch service (dotted
/// `evaluator.metric` strings). `rows` holds per-row evaluator outputs and
/// is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    /// Aggregated metrics keyed by dotted metric key
    pub metrics: BTreeMap<String, f64>,

    /// Per-row outputs as written to the raw result file
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
}

impl ResultBundle {
    /// Create a bundle from aggregated metrics and raw rows
    pub fn new(metrics: BTreeMap<String, f64>, rows: Vec<serde_json::Value>) -> Self {
        Self { metrics, rows }
    }

    /// Create a bundle with metrics only
    pub fn from_metrics<I, K>(metrics: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            metrics: metrics.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            rows: Vec::new(),
        }
    }

    /// Number of evaluated rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
