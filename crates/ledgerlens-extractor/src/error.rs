//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// A section whose response is not valid JSON is not an error: it is
/// recorded in the report as an `Invalid JSON` entry.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error in section '{section}': {message}")]
    Llm {
        /// Section being extracted
        section: String,
        /// Provider message
        message: String,
    },

    /// Extraction timeout
    #[error("Extraction of section '{0}' timed out after {1} seconds")]
    Timeout(String, u64),

    /// Prompt template is malformed or names an unknown placeholder
    #[error("Prompt template error: {0}")]
    Template(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

impl From<regex::Error> for ExtractorError {
    fn from(e: regex::Error) -> Self {
        ExtractorError::Config(format!("Invalid pattern: {}", e))
    }
}
