//! Metric extraction from result bundles

use std::collections::HashMap;

use super::{MetricKey, ResultBundle};
use crate::ordered::OrderedMap;

/// Value used for a metric the bundle does not contain
///
/// Missing metrics degrade to the worst score so the group still grades
/// (and fails) instead of aborting the report.
pub const MISSING_METRIC_DEFAULT: f64 = 0.0;

/// Pulls named metrics out of a [`ResultBundle`]
pub struct MetricExtractor;

impl MetricExtractor {
    /// Extract `keys` from `bundle`, in the order given
    ///
    /// Keys absent from the bundle, and non-finite values, resolve to
    /// [`MISSING_METRIC_DEFAULT`].
    pub fn extract(bundle: &ResultBundle, keys: &[MetricKey]) -> OrderedMap<MetricKey, f64> {
        let available = Self::parse_bundle(bundle);

        keys.iter()
            .map(|key| {
                let value = match available.get(key) {
                    Some(value) if value.is_finite() => *value,
                    Some(value) => {
                        tracing::debug!(metric = %key, value = %value, "non-finite metric, using default");
                        MISSING_METRIC_DEFAULT
                    }
                    None => {
                        tracing::debug!(metric = %key, "metric missing from result bundle, using default");
                        MISSING_METRIC_DEFAULT
                    }
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Parse the bundle's wire keys once so later lookups compare parts, not strings
    fn parse_bundle(bundle: &ResultBundle) -> HashMap<MetricKey, f64> {
        bundle
            .metrics
            .iter()
            .filter_map(|(raw, value)| match MetricKey::parse(raw) {
                Ok(key) => Some((key, *value)),
                Err(_) => {
                    tracing::debug!(key = %raw, "ignoring metric without evaluator prefix");
                    None
                }
            })
            .collect()
    }
}
