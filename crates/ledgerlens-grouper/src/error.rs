//! Grouper error types

use thiserror::Error;

/// Errors that can occur while grouping
#[derive(Error, Debug)]
pub enum GrouperError {
    /// A changes-in-equity row has no string `name`
    #[error("Row {index} of '{section}' has no name")]
    MissingName {
        /// Section holding the row
        section: String,
        /// Position of the row in its list
        index: usize,
    },

    /// Taxonomy is malformed
    #[error("Taxonomy error: {0}")]
    Config(String),
}
