//! CLI argument definitions using clap
//!
//! - gauge                      # Run the default suite
//! - gauge run -s suite.yaml    # Run a specific suite
//! - gauge run -g api           # Run selected groups only
//! - gauge list / validate      # Inspect a suite
//! - gauge report summary.json  # Re-render a persisted summary

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default suite file, relative to the working directory
pub const DEFAULT_SUITE_FILE: &str = "evaluation/gauge.yaml";

#[derive(Parser)]
#[command(name = "gauge")]
#[command(about = "Gauge - run evaluator suites and gate CI on metric thresholds")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the suite; exits 0 only when every group passes
    Run {
        /// Path to the suite file
        #[arg(long, short, default_value = DEFAULT_SUITE_FILE, env = "GAUGE_SUITE")]
        suite: PathBuf,

        /// Where to write the summary (default: from the suite)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Run only these groups (repeatable)
        #[arg(long = "group", short = 'g')]
        groups: Vec<String>,

        /// Output format: table, json, markdown
        #[arg(long, short, default_value = "table")]
        format: String,

        /// Do not write the summary file
        #[arg(long)]
        no_summary: bool,
    },

    /// List the groups a suite declares
    List {
        /// Path to the suite file
        #[arg(long, short, default_value = DEFAULT_SUITE_FILE, env = "GAUGE_SUITE")]
        suite: PathBuf,
    },

    /// Load and validate a suite without running it
    Validate {
        /// Path to the suite file
        #[arg(long, short, default_value = DEFAULT_SUITE_FILE, env = "GAUGE_SUITE")]
        suite: PathBuf,
    },

    /// Render a persisted summary
    Report {
        /// Summary JSON file
        input: PathBuf,

        /// Output format: table, json, markdown
        #[arg(long, short, default_value = "table")]
        format: String,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            suite: PathBuf::from(DEFAULT_SUITE_FILE),
            summary: None,
            groups: Vec::new(),
            format: "table".to_string(),
            no_summary: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["gauge"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Commands::default(), Commands::Run { no_summary: false, .. }));
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from([
            "gauge", "run", "-s", "ci/suite.yaml", "-g", "api", "-g", "invitation", "--format",
            "json", "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Run {
                suite,
                groups,
                format,
                ..
            }) => {
                assert_eq!(suite, PathBuf::from("ci/suite.yaml"));
                assert_eq!(groups, vec!["api", "invitation"]);
                assert_eq!(format, "json");
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_report_requires_input() {
        assert!(Cli::try_parse_from(["gauge", "report"]).is_err());
        assert!(Cli::try_parse_from(["gauge", "report", "results/summary.json"]).is_ok());
    }
}
