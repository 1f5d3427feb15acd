//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use ledgerlens_comparator::ComparisonResult;
use ledgerlens_domain::{ExtractionReport, SectionResult};
use ledgerlens_gatekeeper::ValidationResult;
use ledgerlens_grouper::GroupingOutcome;
use serde_json::json;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Summarize an extraction report written to `output`.
    pub fn format_extraction(&self, report: &ExtractionReport, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(output.display().to_string()),
            OutputFormat::Json => {
                let failed: Vec<&str> = report
                    .key_metrics_by_section
                    .iter()
                    .filter(|(_, result)| result.is_failed())
                    .map(|(name, _)| name.as_str())
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "output": output,
                    "source_file": report.source_file,
                    "sections": report.sections,
                    "failed_sections": failed,
                }))?)
            }
            OutputFormat::Table => {
                if report.sections.is_empty() {
                    return Ok(self.warning("No statement sections found."));
                }

                let mut builder = Builder::default();
                builder.push_record(["Section", "Status", "Fields"]);
                for name in &report.sections {
                    let (status, fields) = match report.key_metrics_by_section.get(name) {
                        Some(SectionResult::Parsed(value)) => {
                            ("parsed", field_count(value).to_string())
                        }
                        Some(SectionResult::Failed(failure)) => {
                            ("failed", failure.error.clone())
                        }
                        None => ("absent", String::new()),
                    };
                    builder.push_record([name.as_str(), status, fields.as_str()]);
                }

                let mut out = self.table(builder);
                out.push('\n');
                let message = format!(
                    "Extracted {} section(s) to {}",
                    report.sections.len(),
                    output.display()
                );
                if report.failed_sections() > 0 {
                    out.push_str(&self.warning(&format!(
                        "{} ({} failed)",
                        message,
                        report.failed_sections()
                    )));
                } else {
                    out.push_str(&self.success(&message));
                }
                Ok(out)
            }
        }
    }

    /// Summarize a grouping outcome written to `output`.
    pub fn format_grouping(&self, outcome: &GroupingOutcome, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(output.display().to_string()),
            OutputFormat::Json => {
                let counts: serde_json::Map<String, serde_json::Value> = outcome
                    .grouped
                    .categories()
                    .map(|(name, bucket)| (name.to_string(), json!(bucket.len())))
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "output": output,
                    "items": outcome.grouped.item_count(),
                    "categories": counts,
                    "skipped": outcome.skipped,
                }))?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Category", "Items"]);
                for (name, bucket) in outcome.grouped.categories() {
                    builder.push_record([name.to_string(), bucket.len().to_string()]);
                }

                let mut out = self.table(builder);
                out.push('\n');
                out.push_str(&self.success(&format!(
                    "Grouped {} item(s) to {}",
                    outcome.grouped.item_count(),
                    output.display()
                )));
                for item in &outcome.skipped {
                    out.push('\n');
                    out.push_str(&self.warning(&format!(
                        "Skipped {}{}: {}",
                        item.section,
                        if item.path.is_empty() {
                            String::new()
                        } else {
                            format!(" / {}", item.path)
                        },
                        item.reason
                    )));
                }
                Ok(out)
            }
        }
    }

    /// Summarize a validation result written to `output`.
    pub fn format_validation(&self, result: &ValidationResult, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(output.display().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "output": output,
                "summary": result.summary,
                "balance_check": result.balance_check,
            }))?),
            OutputFormat::Table => {
                let balance = &result.balance_check;
                let mut builder = Builder::default();
                builder.push_record(["Check", "Value"]);
                builder.push_record(["Total assets".to_string(), amount(balance.total_assets)]);
                builder.push_record([
                    "Total liabilities".to_string(),
                    amount(balance.total_liabilities),
                ]);
                builder.push_record(["Total equity".to_string(), amount(balance.total_equity)]);
                builder.push_record([
                    "Difference".to_string(),
                    balance.difference.map(amount).unwrap_or_else(|| "-".into()),
                ]);
                builder.push_record([
                    "Tolerance".to_string(),
                    balance.tolerance.map(amount).unwrap_or_else(|| "-".into()),
                ]);
                builder.push_record([
                    "Missing values".to_string(),
                    result.summary.missing_count.to_string(),
                ]);
                builder.push_record([
                    "Negative values".to_string(),
                    result.summary.negative_count.to_string(),
                ]);

                let mut out = self.table(builder);
                out.push('\n');
                if result.summary.balance_ok {
                    out.push_str(&self.success("Balance sheet balances"));
                } else {
                    out.push_str(&self.error("Balance sheet does not balance"));
                }
                out.push('\n');
                out.push_str(&self.info(&format!("Report written to {}", output.display())));
                Ok(out)
            }
        }
    }

    /// Summarize a comparison written to `output`.
    pub fn format_comparison(&self, result: &ComparisonResult, output: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Quiet => Ok(output.display().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "output": output,
                "summary": result.summary,
                "metrics": result.metrics,
            }))?),
            OutputFormat::Table => {
                let summary = &result.summary;
                let mut builder = Builder::default();
                builder.push_record(["Measure", "Value"]);
                builder.push_record([
                    "Baseline fields".to_string(),
                    summary.total_fields_mine.to_string(),
                ]);
                builder.push_record([
                    "Candidate fields".to_string(),
                    summary.total_fields_gpt.to_string(),
                ]);
                builder.push_record([
                    "Common fields".to_string(),
                    summary.common_fields.to_string(),
                ]);
                builder.push_record([
                    "Missing rate".to_string(),
                    format!("{:.2}%", summary.missing_rate_pct),
                ]);
                match &result.metrics {
                    Some(metrics) => {
                        builder.push_record([
                            "Accuracy".to_string(),
                            format!("{:.2}%", metrics.accuracy_pct),
                        ]);
                        builder.push_record(["MAE".to_string(), amount(metrics.mae)]);
                        builder.push_record([
                            "MAPE".to_string(),
                            metrics
                                .mape_pct
                                .map(|m| format!("{:.2}%", m))
                                .unwrap_or_else(|| "-".into()),
                        ]);
                        builder.push_record(["RMSE".to_string(), amount(metrics.rmse)]);
                        builder.push_record([
                            "R²".to_string(),
                            metrics
                                .r2
                                .map(|r| format!("{:.4}", r))
                                .unwrap_or_else(|| "-".into()),
                        ]);
                    }
                    None => builder.push_record(["Metrics".to_string(), "-".to_string()]),
                }

                let mut out = self.table(builder);
                out.push('\n');
                if result.metrics.is_none() {
                    out.push_str(&self.warning("No common fields to score"));
                    out.push('\n');
                }
                out.push_str(&self.info(&format!("Report written to {}", output.display())));
                Ok(out)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Two-decimal amount with thousands separators.
fn amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Number of leaf values in a parsed section.
fn field_count(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => map.values().map(field_count).sum(),
        serde_json::Value::Array(items) => items.iter().map(field_count).sum(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerlens_comparator::compare;
    use ledgerlens_domain::{MetricEntry, SectionFailure};
    use ledgerlens_gatekeeper::Gatekeeper;
    use ledgerlens_grouper::Grouper;
    use std::collections::BTreeMap;

    fn sample_report() -> ExtractionReport {
        let mut results = BTreeMap::new();
        results.insert(
            "Statement of Financial Position".to_string(),
            SectionResult::Parsed(json!({
                "Cash": {"current_year": 100, "category_hint": "Current Asset"}
            })),
        );
        results.insert(
            "Statement of Cash Flows".to_string(),
            SectionResult::Failed(SectionFailure::invalid_json("not json")),
        );
        ExtractionReport {
            source_file: "annual.txt".to_string(),
            extraction_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            sections: vec![
                "Statement of Financial Position".to_string(),
                "Statement of Cash Flows".to_string(),
            ],
            key_metrics_by_section: results,
        }
    }

    #[test]
    fn test_extraction_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_extraction(&sample_report(), Path::new("out.json"))
            .unwrap();
        assert!(output.contains("Section"));
        assert!(output.contains("parsed"));
        assert!(output.contains("Invalid JSON"));
        assert!(output.contains("⚠ Extracted 2 section(s) to out.json (1 failed)"));
    }

    #[test]
    fn test_extraction_json_lists_failures() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_extraction(&sample_report(), Path::new("out.json"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["failed_sections"], json!(["Statement of Cash Flows"]));
        assert_eq!(value["output"], "out.json");
    }

    #[test]
    fn test_quiet_format_is_path() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_extraction(&sample_report(), Path::new("/tmp/out.json"))
            .unwrap();
        assert_eq!(output, "/tmp/out.json");
    }

    #[test]
    fn test_empty_extraction() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut report = sample_report();
        report.sections.clear();
        report.key_metrics_by_section.clear();
        let output = formatter.format_extraction(&report, Path::new("x")).unwrap();
        assert!(output.contains("No statement sections found"));
    }

    #[test]
    fn test_grouping_table_lists_skipped() {
        let mut report = sample_report();
        report.key_metrics_by_section.insert(
            "Statement of Financial Position".to_string(),
            SectionResult::Parsed(json!({"Cash": {"current_year": 100}, "Note": "n/a"})),
        );
        let outcome = Grouper::default_taxonomy().group_report(&report).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_grouping(&outcome, Path::new("g.json")).unwrap();
        assert!(output.contains("Category"));
        assert!(output.contains("✓ Grouped 1 item(s) to g.json"));
        assert!(output.contains("⚠ Skipped Statement of Cash Flows:"));
        assert!(output.contains("⚠ Skipped Statement of Financial Position / Note:"));
    }

    #[test]
    fn test_validation_table() {
        let mut outcome = Grouper::default_taxonomy()
            .group_report(&sample_report())
            .unwrap();
        outcome.grouped.insert(
            "Equity",
            None,
            "Share capital",
            MetricEntry::new(100i64).into(),
        );
        let result = Gatekeeper::default_config().validate(&outcome.grouped).unwrap();

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_validation(&result, Path::new("v.json")).unwrap();
        assert!(output.contains("Total assets"));
        assert!(output.contains("100.00"));
        assert!(output.contains("✓ Balance sheet balances"));
    }

    #[test]
    fn test_comparison_without_common_fields() {
        let result = compare(&json!({"a": {"current_year": 1}}), &json!({}));
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_comparison(&result, Path::new("c.json")).unwrap();
        assert!(output.contains("Missing rate"));
        assert!(output.contains("⚠ No common fields to score"));

        let json_output = Formatter::new(OutputFormat::Json, false)
            .format_comparison(&result, Path::new("c.json"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_output).unwrap();
        assert!(value["metrics"].is_null());
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(0.0), "0.00");
        assert_eq!(amount(1234567.891), "1,234,567.89");
        assert_eq!(amount(-950.5), "-950.50");
        assert_eq!(amount(100.0), "100.00");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
