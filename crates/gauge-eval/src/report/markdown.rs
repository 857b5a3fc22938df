//! Markdown report generation

use anyhow::Result;

use super::Summary;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report
    pub fn generate(summary: &Summary) -> Result<String> {
        let mut md = String::new();

        md.push_str("# Evaluation Report\n\n");

        md.push_str("## Overview\n\n");
        md.push_str(&format!(
            "- **Timestamp**: {}\n",
            summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        md.push_str(&format!(
            "- **Overall Status**: {}\n",
            summary.overall_status
        ));
        md.push_str(&format!(
            "- **Groups**: {} passed, {} failed, {} skipped\n\n",
            summary.passed(),
            summary.failed(),
            summary.skipped.len()
        ));

        md.push_str("## Results by Group\n\n");
        md.push_str("| Group | Status | Metric | Value |\n");
        md.push_str("|-------|--------|--------|-------|\n");

        for (name, record) in summary.evaluations.iter() {
            let icon = if record.status.is_pass() { "✅" } else { "❌" };
            for (index, (metric, value)) in record.metrics.iter().enumerate() {
                // Group and status only on the first row of each group
                let (group, status) = if index == 0 {
                    (name.as_str(), format!("{} {}", icon, record.status))
                } else {
                    ("", String::new())
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {:.2}% |\n",
                    group,
                    status,
                    metric,
                    value * 100.0
                ));
            }
        }
        md.push('\n');

        if !summary.skipped.is_empty() {
            md.push_str("## Skipped Groups\n\n");
            for skipped in &summary.skipped {
                md.push_str(&format!(
                    "- **{}** ({}): {}\n",
                    skipped.group, skipped.reason, skipped.detail
                ));
            }
            md.push('\n');
        }

        Ok(md)
    }
}
