//! Compare command implementation.

use super::{read_json, write_json};
use crate::cli::CompareArgs;
use crate::error::Result;
use crate::output::Formatter;
use ledgerlens_comparator::{compare, ComparisonResult};
use serde_json::Value;
use std::path::Path;

/// Execute the compare command.
pub fn execute_compare(args: CompareArgs, formatter: &Formatter) -> Result<()> {
    let result = compare_files(&args.baseline, &args.candidate, &args.output)?;
    println!("{}", formatter.format_comparison(&result, &args.output)?);
    Ok(())
}

/// Compare two JSON files and write the result to `output`.
pub fn compare_files(baseline: &Path, candidate: &Path, output: &Path) -> Result<ComparisonResult> {
    let baseline: Value = read_json(baseline)?;
    let candidate: Value = read_json(candidate)?;

    let result = compare(&baseline, &candidate);
    write_json(output, &result)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;

    #[test]
    fn test_compare_files() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = dir.path().join("mine.json");
        let candidate = dir.path().join("gpt.json");
        fs::write(
            &baseline,
            r#"{"Cash": {"current_year": 100, "previous_year": 80}, "Plant": {"current_year": 50}}"#,
        )
        .unwrap();
        fs::write(&candidate, r#"{"Cash": {"current_year": 100, "previous_year": 90}}"#).unwrap();
        let output = dir.path().join("comparison.json");

        let result = compare_files(&baseline, &candidate, &output).unwrap();
        assert_eq!(result.summary.common_fields, 2);
        assert_eq!(result.missing_in_gpt, vec!["Plant.current_year"]);

        let written: ComparisonResult = read_json(&output).unwrap();
        assert_eq!(written, result);
        assert_eq!(written.metrics.unwrap().accuracy_pct, 50.0);
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let baseline = dir.path().join("mine.json");
        fs::write(&baseline, "{not json").unwrap();

        let result = compare_files(&baseline, &baseline, &dir.path().join("out.json"));
        assert!(matches!(result, Err(CliError::Serialization(_))));
    }
}
