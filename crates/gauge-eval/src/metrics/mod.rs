//! Metric addressing, result bundles and extraction
//!
//! Evaluator output is summarized by the batch service into flat
//! `evaluator.metric` keys. This module parses those keys and pulls the
//! values a group's threshold rule needs.

mod extractor;
mod key;
mod types;

pub use extractor::{MISSING_METRIC_DEFAULT, MetricExtractor};
pub use key::{MetricKey, MetricKeyError};
pub use types::ResultBundle;
