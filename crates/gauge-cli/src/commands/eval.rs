//! Evaluation commands: run, list, validate and report

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gauge_eval::error::{ControllerError, error_chain};
use gauge_eval::report::{ReportFormat, SummaryAggregator, generate_report};
use gauge_eval::runner::{HarnessConfig, RunController, RunProgress, exit_code};
use gauge_eval::suite::{Suite, SuiteLoader};

use crate::console::CliConsole;

/// Run the suite and return the process exit code
pub async fn run(
    suite_file: PathBuf,
    summary: Option<PathBuf>,
    groups: Vec<String>,
    format: String,
    no_summary: bool,
    verbose: bool,
) -> Result<u8> {
    let mut config = HarnessConfig::new(suite_file)
        .with_groups(groups)
        .with_report_format(format);

    if let Some(path) = summary {
        config = config.with_summary_path(path);
    }

    if no_summary {
        config = config.without_summary();
    }

    if verbose {
        config = config.verbose();
    }

    run_with_config(&config).await
}

/// Run the suite described by `config`
pub async fn run_with_config(config: &HarnessConfig) -> Result<u8> {
    let console = CliConsole::new(config.verbose);
    let report_format = parse_format(&config.report_format);

    let suite = load_suite(&config.suite_file)?;
    let groups = suite.select(&config.groups)?;

    let mut controller = RunController::from_config(config, &suite);
    controller.set_progress_callback(Box::new(|progress: RunProgress| {
        eprintln!(
            "[{}/{}] {} - {}",
            progress.current + 1,
            progress.total,
            progress.group,
            progress.message
        );
    }));

    let result = controller.execute(&groups).await;

    match &result {
        Ok(summary) => {
            println!("{}", generate_report(summary, report_format)?);

            if let Some(path) = controller.summary_path() {
                console.info(&format!("Summary saved to {}", path.display()));
            }
            console.verdict(
                summary.overall_status,
                summary.passed(),
                summary.evaluations.len(),
            );
        }
        Err(ControllerError::NoEvaluationsRan { .. }) => {
            console.error("No evaluations could be run");
        }
        Err(e) => console.error(&error_chain(e)),
    }

    Ok(u8::try_from(exit_code(&result)).unwrap_or(1))
}

/// List the groups of a suite
pub async fn list(suite_file: PathBuf) -> Result<u8> {
    let suite = load_suite(&suite_file)?;

    if suite.groups.is_empty() {
        println!("No groups found.");
        return Ok(0);
    }

    println!("Evaluation groups in {}:\n", suite_file.display());
    println!("{:<20} {:<40} {:<20}", "Group", "Dataset", "Evaluators");
    println!("{:-<80}", "");

    for group in &suite.groups {
        let dataset = group
            .dataset_path
            .strip_prefix(&suite.base_dir)
            .unwrap_or(&group.dataset_path);
        let evaluators: Vec<&str> = group.evaluators.keys().map(String::as_str).collect();
        println!(
            "{:<20} {:<40} {:<20}",
            group.name,
            dataset.display(),
            evaluators.join(", ")
        );
        for condition in &group.threshold.conditions {
            println!("{:<20} requires {}", "", condition);
        }
    }

    println!("\nTotal: {} groups", suite.groups.len());
    println!("Summary: {}", suite.summary_path.display());

    Ok(0)
}

/// Validate a suite without running it
pub async fn validate(suite_file: PathBuf) -> Result<u8> {
    let console = CliConsole::new(true);
    let suite = load_suite(&suite_file)?;

    console.success(&format!(
        "{} is valid ({} groups)",
        suite_file.display(),
        suite.groups.len()
    ));

    for group in &suite.groups {
        if !group.dataset_path.exists() {
            console.warn(&format!(
                "group '{}': dataset {} does not exist and will be skipped",
                group.name,
                group.dataset_path.display()
            ));
        }
    }

    Ok(0)
}

/// Show a summary from a previous run
pub async fn report(input: PathBuf, format: String) -> Result<u8> {
    let summary = SummaryAggregator::load(&input).await?;

    println!("{}", generate_report(&summary, parse_format(&format))?);

    Ok(0)
}

fn parse_format(format: &str) -> ReportFormat {
    ReportFormat::from_str(format).unwrap_or_else(|| {
        tracing::warn!(format = %format, "Unknown report format, using table");
        ReportFormat::Table
    })
}

fn load_suite(path: &Path) -> Result<Suite> {
    SuiteLoader::load(path).with_context(|| format!("Failed to load suite: {:?}", path))
}
