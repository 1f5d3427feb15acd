//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::prompt::PromptTemplate;
use crate::repair::JsonRepair;
use crate::segmenter::Segmenter;
use ledgerlens_domain::metric::VALIDATION;
use ledgerlens_domain::traits::LlmProvider;
use ledgerlens_domain::{
    ExtractionReport, MetricNode, RawDocument, Section, SectionFailure, SectionResult,
};
use ledgerlens_gatekeeper::Gatekeeper;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Key under which a generator may nest the extracted items
pub const METRICS_KEY: &str = "metrics";

/// The Extractor turns statement sections into structured items
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    template: PromptTemplate,
    segmenter: Segmenter,
    repair: JsonRepair,
    gatekeeper: Gatekeeper,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider + Sync,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(
        llm_provider: L,
        template: PromptTemplate,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self {
            segmenter: Segmenter::new(&config.segmenter)?,
            repair: JsonRepair::new()?,
            gatekeeper: Gatekeeper::default_config(),
            llm_provider,
            template,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Cut a document into statement sections
    pub fn segment(&self, document: &RawDocument) -> Vec<Section> {
        self.segmenter.segment(document)
    }

    /// Segment and extract a whole document
    pub async fn extract_document(
        &self,
        source_file: &str,
        document: &RawDocument,
    ) -> Result<ExtractionReport, ExtractorError> {
        info!(
            "Starting extraction for '{}', {} chars, model {}",
            source_file,
            document.char_len(),
            self.llm_provider.model_name()
        );

        let sections = self.segment(document);
        if sections.is_empty() {
            warn!("No statement sections found in '{}'", source_file);
        }

        let key_metrics_by_section = self.extract_sections(&sections).await?;
        let report = ExtractionReport {
            source_file: source_file.to_string(),
            extraction_date: chrono::Local::now().date_naive(),
            sections: sections.iter().map(|s| s.name().to_string()).collect(),
            key_metrics_by_section,
        };

        info!(
            "Extracted {} sections ({} unparseable)",
            report.sections.len(),
            report.failed_sections()
        );
        Ok(report)
    }

    /// Extract each section in turn
    ///
    /// A generation failure in any section aborts the whole call.
    pub async fn extract_sections(
        &self,
        sections: &[Section],
    ) -> Result<BTreeMap<String, SectionResult>, ExtractorError> {
        let mut results = BTreeMap::new();
        for section in sections {
            let result = self.extract_section(section).await?;
            results.insert(section.name().to_string(), result);
        }
        Ok(results)
    }

    /// Extract one section
    pub async fn extract_section(&self, section: &Section) -> Result<SectionResult, ExtractorError> {
        let prompt = self.template.render(section.name(), &section.text);
        debug!("Prompt for {}: {} chars", section.name(), prompt.len());

        let raw = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(&prompt, self.config.temperature),
        )
        .await
        .map_err(|_| {
            ExtractorError::Timeout(section.name().to_string(), self.config.extraction_timeout_secs)
        })?
        .map_err(|e| ExtractorError::Llm {
            section: section.name().to_string(),
            message: e.to_string(),
        })?;

        debug!("Response for {}: {} chars", section.name(), raw.len());
        self.interpret(section.name(), raw)
    }

    fn interpret(&self, section: &str, raw: String) -> Result<SectionResult, ExtractorError> {
        let Some(mut parsed) = self.repair.parse(&raw) else {
            let preview: String = raw.chars().take(200).collect();
            warn!("Response for {} is not valid JSON: {}", section, preview);
            return Ok(SectionResult::Failed(SectionFailure::invalid_json(raw)));
        };

        if self.config.validate_items {
            if let Value::Object(root) = &mut parsed {
                if let Some(Value::Object(metrics)) = root.get(METRICS_KEY) {
                    let metrics = MetricNode::from_value(Value::Object(metrics.clone()));
                    let check = match &metrics {
                        MetricNode::Group(items) => self
                            .gatekeeper
                            .check_items(items.iter().map(|(k, v)| (k.as_str(), v))),
                        node => self.gatekeeper.check_items([(METRICS_KEY, node)]),
                    };
                    debug!(
                        "{}: {} missing, {} negative",
                        section, check.missing_count, check.negative_count
                    );
                    root.insert(VALIDATION.to_string(), serde_json::to_value(check)?);
                }
            }
        }

        Ok(SectionResult::Parsed(parsed))
    }
}
