//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ledgerlens CLI - Extract, group and check financial statements.
#[derive(Debug, Parser)]
#[command(name = "ledgerlens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LEDGERLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (artifact paths only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract per-statement metrics from a document
    Extract(ExtractArgs),

    /// Group an extraction report into the category taxonomy
    Group(GroupArgs),

    /// Check a grouped report for gaps and balance
    Validate(ValidateArgs),

    /// Score a candidate report against a baseline
    Compare(CompareArgs),

    /// Extract, group and validate in one pass
    Run(ExtractArgs),
}

/// Arguments for the extract and run commands.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Plain-text document (pages separated by `--- PAGE n ---` markers)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Extraction report to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Model name, overriding the configuration
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama endpoint, overriding the configuration
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Sampling temperature, overriding the configuration
    #[arg(short, long)]
    pub temperature: Option<f64>,
}

/// Arguments for the group command.
#[derive(Debug, Parser)]
pub struct GroupArgs {
    /// Extraction report to read
    #[arg(short, long)]
    pub input: PathBuf,

    /// Grouped report to write
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Grouped report to read
    #[arg(short, long)]
    pub input: PathBuf,

    /// Validation report to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Balance tolerance as a fraction of total assets
    #[arg(long)]
    pub tolerance: Option<f64>,
}

/// Arguments for the compare command.
#[derive(Debug, Parser)]
pub struct CompareArgs {
    /// Reference report
    #[arg(short, long)]
    pub baseline: PathBuf,

    /// Report to score against the baseline
    #[arg(short = 'n', long)]
    pub candidate: PathBuf,

    /// Comparison report to write
    #[arg(short, long)]
    pub output: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["ledgerlens"]).is_err());
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "ledgerlens",
            "extract",
            "--input",
            "report.txt",
            "--output",
            "out.json",
            "--model",
            "qwen2.5:7b",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("report.txt"));
                assert_eq!(args.model.as_deref(), Some("qwen2.5:7b"));
                assert!(args.endpoint.is_none());
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "ledgerlens",
            "compare",
            "-b",
            "a.json",
            "-n",
            "b.json",
            "-o",
            "c.json",
            "--format",
            "json",
            "-vv",
        ]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Compare(_)));
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, crate::config::OutputFormat::Quiet);
    }
}
