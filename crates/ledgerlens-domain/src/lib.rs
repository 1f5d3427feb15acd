//! Ledgerlens Domain Layer
//!
//! This crate contains the data model shared by every stage of the statement
//! pipeline and the trait interfaces the stages depend upon.
//!
//! ## Key Concepts
//!
//! - **RawDocument**: Full document text with `--- PAGE n ---` markers
//! - **StatementKind**: The four recognized financial statements
//! - **MetricNode**: Irregular generator output as a tagged union
//!   (leaf entry, named group, list, scalar)
//! - **GroupedReport**: Items reclassified into the financial taxonomy
//!
//! ## Architecture
//!
//! - Pure data and traversal logic only
//! - Network and file access live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod metric;
pub mod report;
pub mod statement;
pub mod traits;

// Re-exports for convenience
pub use document::{RawDocument, Section};
pub use metric::{Amount, MetricEntry, MetricNode};
pub use report::{
    Bucket, ExtractionReport, GroupedReport, ItemMap, SectionFailure, SectionResult,
};
pub use statement::StatementKind;
