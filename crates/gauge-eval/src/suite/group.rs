//! Evaluation group definition

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::batch::ColumnMapping;
use crate::error::ConfigError;
use crate::evaluators::Evaluator;
use crate::grading::{Condition, ThresholdRule};
use crate::metrics::MetricKey;
use crate::ordered::OrderedMap;

/// A named test suite: evaluators sharing one dataset and one output path
#[derive(Debug, Clone)]
pub struct EvaluationGroup {
    /// Group name, used as the summary key
    pub name: String,

    /// Human-readable description
    pub description: Option<String>,

    /// JSON-lines dataset evaluated by every evaluator of the group
    pub dataset_path: PathBuf,

    /// Evaluators by name, in declaration order
    pub evaluators: OrderedMap<String, Arc<dyn Evaluator>>,

    /// Column mapping per evaluator name
    pub column_mapping: BTreeMap<String, ColumnMapping>,

    /// Where the raw result bundle is written
    pub result_output_path: PathBuf,

    /// Pass/fail rule for the group
    pub threshold: ThresholdRule,
}

impl EvaluationGroup {
    /// Create a group with no evaluators and an empty rule
    pub fn new(
        name: impl Into<String>,
        dataset_path: impl Into<PathBuf>,
        result_output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            dataset_path: dataset_path.into(),
            evaluators: OrderedMap::new(),
            column_mapping: BTreeMap::new(),
            result_output_path: result_output_path.into(),
            threshold: ThresholdRule::default(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an evaluator together with its column mapping
    pub fn with_evaluator(
        mut self,
        name: impl Into<String>,
        evaluator: Arc<dyn Evaluator>,
        mapping: ColumnMapping,
    ) -> Self {
        let name = name.into();
        self.column_mapping.insert(name.clone(), mapping);
        self.evaluators.insert(name, evaluator);
        self
    }

    /// Add a threshold condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.threshold.conditions.push(condition);
        self
    }

    /// Replace the threshold rule
    pub fn with_threshold(mut self, threshold: ThresholdRule) -> Self {
        self.threshold = threshold;
        self
    }

    /// Metrics the group's rule reads
    pub fn metric_keys(&self) -> Vec<MetricKey> {
        self.threshold.metric_keys()
    }

    /// Check that mappings cover every evaluator input and that the rule
    /// only reads declared evaluators
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluators.is_empty() {
            return Err(ConfigError::NoEvaluators {
                group: self.name.clone(),
            });
        }

        let unmapped = ColumnMapping::new();
        for (name, evaluator) in self.evaluators.iter() {
            let mapping = self.column_mapping.get(name).unwrap_or(&unmapped);
            if let Some(input) = evaluator
                .required_inputs()
                .iter()
                .find(|input| !mapping.contains_input(input))
            {
                return Err(ConfigError::MissingInput {
                    group: self.name.clone(),
                    evaluator: name.clone(),
                    input: input.to_string(),
                });
            }
        }

        if let Some(name) = self
            .column_mapping
            .keys()
            .find(|name| !self.evaluators.contains_key(name.as_str()))
        {
            return Err(ConfigError::UnknownEvaluator {
                group: self.name.clone(),
                evaluator: name.clone(),
            });
        }

        if self.threshold.is_empty() {
            return Err(ConfigError::EmptyRule {
                group: self.name.clone(),
            });
        }

        if let Some(condition) = self
            .threshold
            .conditions
            .iter()
            .find(|c| !self.evaluators.contains_key(c.metric.evaluator()))
        {
            return Err(ConfigError::UnknownThresholdEvaluator {
                group: self.name.clone(),
                evaluator: condition.metric.evaluator().to_string(),
            });
        }

        if let Some(condition) = self
            .threshold
            .conditions
            .iter()
            .find(|c| !c.bound.is_finite())
        {
            return Err(ConfigError::InvalidBound {
                group: self.name.clone(),
                metric: condition.metric.to_string(),
                value: condition.bound,
            });
        }

        // Summary records are keyed by display name
        let mut labels = HashSet::new();
        for condition in &self.threshold.conditions {
            let label = condition.display_name();
            if !labels.insert(label.clone()) {
                return Err(ConfigError::DuplicateLabel {
                    group: self.name.clone(),
                    label,
                });
            }
        }

        Ok(())
    }
}
