//! Harness configuration
//!
//! Options for one invocation of the harness, independent of the suite
//! being run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Suite file (YAML or JSON)
    #[serde(default = "default_suite_file")]
    pub suite_file: PathBuf,

    /// Summary location, overriding the suite's
    pub summary_path: Option<PathBuf>,

    /// Whether to write the summary file
    #[serde(default = "default_save_summary")]
    pub save_summary: bool,

    /// Groups to run (empty = all)
    #[serde(default)]
    pub groups: Vec<String>,

    /// Digest format printed after the run
    #[serde(default = "default_report_format")]
    pub report_format: String,

    /// Whether to run in verbose mode
    #[serde(default)]
    pub verbose: bool,
}

fn default_suite_file() -> PathBuf {
    PathBuf::from("evaluation/gauge.yaml")
}

fn default_save_summary() -> bool {
    true
}

fn default_report_format() -> String {
    "table".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            suite_file: default_suite_file(),
            summary_path: None,
            save_summary: default_save_summary(),
            groups: Vec::new(),
            report_format: default_report_format(),
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Create a new config for the given suite file
    pub fn new(suite_file: impl Into<PathBuf>) -> Self {
        Self {
            suite_file: suite_file.into(),
            ..Default::default()
        }
    }

    /// Set the summary path
    pub fn with_summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    /// Restrict the run to the named groups
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Set the report format
    pub fn with_report_format(mut self, format: impl Into<String>) -> Self {
        self.report_format = format.into();
        self
    }

    /// Run without writing a summary file
    pub fn without_summary(mut self) -> Self {
        self.save_summary = false;
        self
    }

    /// Enable verbose mode
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Summary path to use, given the suite's own default
    pub fn effective_summary_path(&self, suite_default: &Path) -> PathBuf {
        self.summary_path
            .clone()
            .unwrap_or_else(|| suite_default.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.suite_file, PathBuf::from("evaluation/gauge.yaml"));
        assert!(config.save_summary);
        assert!(config.groups.is_empty());
        assert_eq!(config.report_format, "table");
    }

    #[test]
    fn test_config_builder() {
        let config = HarnessConfig::new("ci/suite.json")
            .with_summary_path("out/summary.json")
            .with_groups(vec!["api".to_string()])
            .with_report_format("markdown")
            .verbose();

        assert_eq!(config.groups, vec!["api"]);
        assert!(config.verbose);
        assert_eq!(
            config.effective_summary_path(Path::new("results/summary.json")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            HarnessConfig::default().effective_summary_path(Path::new("results/summary.json")),
            PathBuf::from("results/summary.json")
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: HarnessConfig = serde_yaml::from_str("groups: [trust_score]").unwrap();
        assert_eq!(config.groups, vec!["trust_score"]);
        assert!(config.save_summary);
        assert!(config.summary_path.is_none());
    }
}
