//! Configuration for the Extractor

use crate::ExtractorError;
use ledgerlens_domain::StatementKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default pattern marking where the next statement or notes begin
pub const DEFAULT_BOUNDARY_PATTERN: &str = r"\nStatement of|Laporan|Notes to|Catatan|--- PAGE";

/// How document text is cut into statement sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Characters kept past the next boundary
    pub chunk_size: usize,

    /// Characters after a label start that are skipped before looking for a boundary
    pub label_skip: usize,

    /// Case-insensitive boundary pattern
    pub boundary_pattern: String,

    /// Label pattern overrides, keyed by canonical section name
    pub labels: BTreeMap<String, String>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            label_skip: 100,
            boundary_pattern: DEFAULT_BOUNDARY_PATTERN.to_string(),
            labels: BTreeMap::new(),
        }
    }
}

impl SegmenterConfig {
    /// Label pattern for a statement, honoring overrides
    pub fn label_for(&self, kind: StatementKind) -> &str {
        self.labels
            .get(kind.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| kind.label_pattern())
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Sampling temperature passed to the generator
    pub temperature: f64,

    /// Maximum time for a single section extraction (seconds)
    pub extraction_timeout_secs: u64,

    /// Attach per-item missing/negative checks to parsed `metrics`
    pub validate_items: bool,

    /// Section segmentation
    pub segmenter: SegmenterConfig,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ExtractorError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "extraction_timeout_secs must be greater than 0".to_string(),
            ));
        }
        for name in self.segmenter.labels.keys() {
            if StatementKind::parse(name).is_none() {
                return Err(ExtractorError::Config(format!(
                    "unknown section '{}' in segmenter labels",
                    name
                )));
            }
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            extraction_timeout_secs: 300,
            validate_items: true,
            segmenter: SegmenterConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Deterministic preset: zero temperature
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
