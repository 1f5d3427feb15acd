//! Ledgerlens Extractor
//!
//! Turns the text of a financial report into per-statement structured items.
//!
//! # Architecture
//!
//! ```text
//! RawDocument → Segmenter → Section → prompt → LlmProvider → JsonRepair → SectionResult
//! ```
//!
//! # Key Features
//!
//! - **Segmentation**: English and Indonesian statement headings, character-safe slicing
//! - **Prompting**: `{sections}` / `{text}` templates loaded from TOML
//! - **Lenient parsing**: thousands separators, trailing commas and `None` are repaired
//! - **Isolation**: an unparseable section is recorded, the rest still succeed
//!
//! # Example Usage
//!
//! ```no_run
//! use ledgerlens_domain::RawDocument;
//! use ledgerlens_extractor::{Extractor, ExtractorConfig, PromptTemplate};
//! use ledgerlens_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"Cash": {"current_year": 100}}"#);
//! let extractor = Extractor::new(llm, PromptTemplate::default(), ExtractorConfig::default())?;
//!
//! let document = RawDocument::new("Statement of financial position\nCash 100");
//! let report = extractor.extract_document("annual_report.pdf", &document).await?;
//!
//! println!("Sections: {:?}", report.sections);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod prompt;
mod repair;
mod segmenter;


pub use config::{ExtractorConfig, SegmenterConfig, DEFAULT_BOUNDARY_PATTERN};
pub use error::ExtractorError;
pub use extractor::{Extractor, METRICS_KEY};
pub use prompt::{PromptTemplate, DEFAULT_TEMPLATE};
pub use repair::JsonRepair;
pub use segmenter::Segmenter;
