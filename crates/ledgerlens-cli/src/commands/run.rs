//! Run command implementation: extract, group and validate in one pass.

use super::extract::{apply_overrides, extract_to_file};
use super::group::group_to_file;
use super::sibling_path;
use super::validate::validate_to_file;
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ledgerlens_domain::traits::LlmProvider;
use ledgerlens_domain::ExtractionReport;
use ledgerlens_gatekeeper::ValidationResult;
use ledgerlens_grouper::GroupingOutcome;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

/// Artifacts of a full pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Extraction stage output
    pub report: ExtractionReport,
    /// Grouping stage output
    pub grouping: GroupingOutcome,
    /// Validation stage output
    pub validation: ValidationResult,
    /// Where the grouped report was written
    pub grouped_path: PathBuf,
    /// Where the validation report was written
    pub validation_path: PathBuf,
}

/// Execute the run command.
pub async fn execute_run(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let config = apply_overrides(config, &args)?;
    let provider = config.provider()?;

    let outcome = run_pipeline(provider, &config, &args.input, &args.output).await?;

    println!("{}", formatter.format_extraction(&outcome.report, &args.output)?);
    println!(
        "{}",
        formatter.format_grouping(&outcome.grouping, &outcome.grouped_path)?
    );
    println!(
        "{}",
        formatter.format_validation(&outcome.validation, &outcome.validation_path)?
    );
    Ok(())
}

/// Run every stage, writing `.grouped.json` and `.validation.json` next to `output`.
pub async fn run_pipeline<L>(
    provider: L,
    config: &Config,
    input: &Path,
    output: &Path,
) -> Result<PipelineOutcome>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let grouper = config.grouper()?;
    let gatekeeper = config.gatekeeper();

    let report = extract_to_file(provider, config, input, output).await?;

    let grouped_path = sibling_path(output, "grouped");
    let grouping = group_to_file(&grouper, &report, &grouped_path)?;

    let validation_path = sibling_path(output, "validation");
    let validation = validate_to_file(&gatekeeper, &grouping.grouped, &validation_path)?;

    info!(
        "Pipeline finished: {} sections, {} items, balanced={}",
        report.sections.len(),
        grouping.grouped.item_count(),
        validation.summary.balance_ok
    );

    Ok(PipelineOutcome {
        report,
        grouping,
        validation,
        grouped_path,
        validation_path,
    })
}
