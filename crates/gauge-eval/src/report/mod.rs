//! Report generation for run summaries
//!
//! Renders a [`Summary`] as a terminal digest, JSON or Markdown.

mod json;
mod markdown;
mod summary;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use summary::{
    GroupRecord, GroupVerdict, OverallStatus, SkippedGroup, Summary, SummaryAggregator,
};

use anyhow::Result;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Table,
}

impl ReportFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            "table" | "text" => Some(ReportFormat::Table),
            _ => None,
        }
    }
}

/// Generate a report in the specified format
pub fn generate_report(summary: &Summary, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(summary),
        ReportFormat::Markdown => MarkdownReporter::generate(summary),
        ReportFormat::Table => Ok(generate_table(summary)),
    }
}

/// Human-readable digest for terminal output
///
/// One status line per group, one line per metric as a percentage with two
/// decimals, then the overall verdict.
pub fn generate_table(summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{:=<60}\n", ""));
    output.push_str("EVALUATION SUMMARY\n");
    output.push_str(&format!("{:=<60}\n", ""));
    output.push_str(&format!(
        "Timestamp: {}\n",
        summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for (name, record) in summary.evaluations.iter() {
        output.push_str(&format!("\n{}: {}\n", name.to_uppercase(), record.status));
        for (metric, value) in record.metrics.iter() {
            output.push_str(&format!("   - {}: {:.2}%\n", metric, value * 100.0));
        }
    }

    if !summary.skipped.is_empty() {
        output.push_str("\nSKIPPED\n");
        for skipped in &summary.skipped {
            output.push_str(&format!("   - {} ({})\n", skipped.group, skipped.reason));
        }
    }

    output.push_str(&format!("\n{:=<60}\n", ""));
    output.push_str(&format!("OVERALL STATUS: {}\n", summary.overall_status));
    output.push_str(&format!("{:=<60}\n", ""));

    output
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::grading::Status;

    /// Summary with one passing group, one failing group and one skipped group
    pub fn mixed_summary() -> Summary {
        let mut evaluations = crate::ordered::OrderedMap::new();
        evaluations.insert(
            "trust_score".to_string(),
            GroupRecord {
                metrics: [("accuracy".to_string(), 0.96)].into_iter().collect(),
                status: Status::Pass,
            },
        );
        evaluations.insert(
            "api".to_string(),
            GroupRecord {
                metrics: [
                    ("completeness".to_string(), 1.0),
                    ("type_accuracy".to_string(), 0.9),
                    ("response_time".to_string(), 0.85),
                ]
                .into_iter()
                .collect(),
                status: Status::Fail,
            },
        );

        Summary {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            evaluations,
            overall_status: OverallStatus::Fail,
            skipped: vec![SkippedGroup {
                group: "invitation".to_string(),
                reason: "data_not_found".to_string(),
                detail: "dataset for group 'invitation' not found: data/invitation_tests.jsonl"
                    .to_string(),
            }],
        }
    }
}
