//! Group command implementation.

use super::{read_json, sibling_path, write_json};
use crate::cli::GroupArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ledgerlens_domain::ExtractionReport;
use ledgerlens_grouper::{Grouper, GroupingOutcome};
use std::path::Path;
use tracing::warn;

/// Execute the group command.
pub fn execute_group(args: GroupArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report: ExtractionReport = read_json(&args.input)?;
    let outcome = group_to_file(&config.grouper()?, &report, &args.output)?;

    println!("{}", formatter.format_grouping(&outcome, &args.output)?);
    Ok(())
}

/// Group `report`, writing the grouped report to `output` and skipped items
/// to its `.skipped` sibling.
pub fn group_to_file(
    grouper: &Grouper,
    report: &ExtractionReport,
    output: &Path,
) -> Result<GroupingOutcome> {
    let outcome = grouper.group_report(report)?;
    if !outcome.skipped.is_empty() {
        warn!("{} item(s) could not be grouped", outcome.skipped.len());
    }

    write_json(output, &outcome.grouped)?;
    write_json(&sibling_path(output, "skipped"), &outcome.skipped)?;
    Ok(outcome)
}
