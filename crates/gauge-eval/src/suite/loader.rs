//! Suite loading from YAML/JSON files
//!
//! Resolves every path relative to the suite file's directory and validates
//! each group before anything runs.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema::{ConditionDefinition, GroupDefinition, SuiteFile};
use super::EvaluationGroup;
use crate::batch::ColumnMapping;
use crate::error::ConfigError;
use crate::evaluators::Evaluator;
use crate::grading::{Condition, ThresholdRule};
use crate::metrics::MetricKey;
use crate::ordered::OrderedMap;

/// A loaded, validated suite
#[derive(Debug, Clone)]
pub struct Suite {
    /// Directory relative paths were resolved against
    pub base_dir: PathBuf,

    /// Where the run summary is written
    pub summary_path: PathBuf,

    /// Groups in run order
    pub groups: Vec<EvaluationGroup>,
}

impl Suite {
    /// Look up a group by name
    pub fn group(&self, name: &str) -> Option<&EvaluationGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Groups named in `names`, kept in suite order; all groups when empty
    pub fn select(&self, names: &[String]) -> Result<Vec<EvaluationGroup>, ConfigError> {
        if let Some(unknown) = names.iter().find(|name| self.group(name).is_none()) {
            return Err(ConfigError::UnknownGroup(unknown.clone()));
        }

        Ok(self
            .groups
            .iter()
            .filter(|g| names.is_empty() || names.contains(&g.name))
            .cloned()
            .collect())
    }
}

/// Loader for suite files
pub struct SuiteLoader;

impl SuiteLoader {
    /// Load a suite, picking the format from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Suite, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: SuiteFile = if Self::is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let suite = Self::build(file, &base_dir)?;
        tracing::debug!(
            suite = %path.display(),
            groups = suite.groups.len(),
            "Loaded evaluation suite"
        );
        Ok(suite)
    }

    /// Load a suite from a YAML string, resolving paths against `base_dir`
    pub fn from_yaml_str(yaml: &str, base_dir: impl AsRef<Path>) -> Result<Suite, ConfigError> {
        let file: SuiteFile = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })?;
        Self::build(file, base_dir.as_ref())
    }

    /// Turn a parsed suite file into validated groups
    pub fn build(file: SuiteFile, base_dir: &Path) -> Result<Suite, ConfigError> {
        let results_dir = base_dir.join(&file.results_dir);
        let summary_path = file
            .summary_path
            .as_ref()
            .map(|p| base_dir.join(p))
            .unwrap_or_else(|| results_dir.join("summary.json"));

        let mut seen = HashSet::new();
        let mut groups = Vec::with_capacity(file.groups.len());
        for definition in file.groups {
            if !seen.insert(definition.name.clone()) {
                return Err(ConfigError::DuplicateGroup(definition.name));
            }
            let group = Self::build_group(definition, base_dir, &results_dir)?;
            group.validate()?;
            groups.push(group);
        }

        Ok(Suite {
            base_dir: base_dir.to_path_buf(),
            summary_path,
            groups,
        })
    }

    fn build_group(
        definition: GroupDefinition,
        base_dir: &Path,
        results_dir: &Path,
    ) -> Result<EvaluationGroup, ConfigError> {
        let group_name = definition.name;

        let mut evaluators: OrderedMap<String, Arc<dyn Evaluator>> = OrderedMap::new();
        let mut column_mapping = BTreeMap::new();
        for evaluator in definition.evaluators {
            if evaluators.contains_key(evaluator.name.as_str()) {
                return Err(ConfigError::DuplicateEvaluator {
                    group: group_name,
                    evaluator: evaluator.name,
                });
            }

            let built = evaluator
                .spec
                .build()
                .map_err(|message| ConfigError::InvalidEvaluator {
                    group: group_name.clone(),
                    evaluator: evaluator.name.clone(),
                    message,
                })?;

            let mapping = ColumnMapping::parse(&evaluator.column_mapping).map_err(
                |(input, e)| ConfigError::InvalidColumnExpr {
                    group: group_name.clone(),
                    input,
                    expr: e.0,
                },
            )?;

            column_mapping.insert(evaluator.name.clone(), mapping);
            evaluators.insert(evaluator.name, built);
        }

        let threshold = Self::build_rule(&group_name, definition.threshold)?;

        let output = definition
            .output
            .map(|p| base_dir.join(p))
            .unwrap_or_else(|| results_dir.join(format!("{}_results.json", group_name)));

        Ok(EvaluationGroup {
            description: definition.description,
            dataset_path: base_dir.join(definition.dataset),
            evaluators,
            column_mapping,
            result_output_path: output,
            threshold,
            name: group_name,
        })
    }

    fn build_rule(
        group: &str,
        conditions: Vec<ConditionDefinition>,
    ) -> Result<ThresholdRule, ConfigError> {
        let conditions = conditions
            .into_iter()
            .map(|c| {
                let metric =
                    MetricKey::parse(&c.metric).map_err(|source| ConfigError::InvalidMetricKey {
                        group: group.to_string(),
                        source,
                    })?;
                let condition = Condition::new(metric, c.op, c.value);
                Ok(match c.label {
                    Some(label) => condition.with_label(label),
                    None => condition,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(ThresholdRule::all(conditions))
    }

    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}
