//! Ledgerlens CLI library.
//!
//! This library provides the core functionality for the `ledgerlens` command-line
//! interface: configuration loading, the pipeline commands, log setup and
//! terminal output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::run::{run_pipeline, PipelineOutcome};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
