//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file could not be read or written
    #[error("Cannot access {}: {source}", path.display())]
    File {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// LLM provider error
    #[error(transparent)]
    Llm(#[from] ledgerlens_llm::LlmError),

    /// Extraction error
    #[error(transparent)]
    Extractor(#[from] ledgerlens_extractor::ExtractorError),

    /// Grouping error
    #[error(transparent)]
    Grouper(#[from] ledgerlens_grouper::GrouperError),

    /// Validation error
    #[error(transparent)]
    Gatekeeper(#[from] ledgerlens_gatekeeper::GatekeeperError),
}
