//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Grouped report lacks a category required for the balance check
    #[error("Grouped report is missing required category '{0}'")]
    MissingCategory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
