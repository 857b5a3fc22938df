//! CLI console utilities
//!
//! Status lines go to stderr; stdout carries only the rendered report.

use colored::*;
use gauge_eval::OverallStatus;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    /// Create a new CLI console
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print the final verdict line
    pub fn verdict(&self, status: OverallStatus, passed: usize, total: usize) {
        let line = format!("Evaluation {}: {}/{} groups passed", status, passed, total);
        match status {
            OverallStatus::Pass => self.success(&line),
            OverallStatus::Fail | OverallStatus::Unknown => self.error(&line),
        }
    }
}
