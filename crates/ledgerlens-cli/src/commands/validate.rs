//! Validate command implementation.

use super::{read_json, write_json};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ledgerlens_domain::GroupedReport;
use ledgerlens_gatekeeper::{Gatekeeper, ValidationResult};
use serde_json::Value;
use std::path::Path;

/// Execute the validate command.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut validation = config.validation.clone();
    if let Some(tolerance) = args.tolerance {
        validation.balance_tolerance = tolerance;
        validation.validate()?;
    }

    let grouped = load_grouped(&args.input, config)?;
    let result = validate_to_file(&Gatekeeper::new(validation), &grouped, &args.output)?;

    println!("{}", formatter.format_validation(&result, &args.output)?);
    Ok(())
}

/// Read a grouped report, shaping its buckets by the configured taxonomy.
pub fn load_grouped(path: &Path, config: &Config) -> Result<GroupedReport> {
    let value: Value = read_json(path)?;
    let layout = config.grouper()?.taxonomy().empty_report();
    Ok(GroupedReport::from_value_with_layout(value, &layout)?)
}

/// Validate `grouped` and write the result to `output`.
pub fn validate_to_file(
    gatekeeper: &Gatekeeper,
    grouped: &GroupedReport,
    output: &Path,
) -> Result<ValidationResult> {
    let result = gatekeeper.validate(grouped)?;
    write_json(output, &result)?;
    Ok(result)
}
