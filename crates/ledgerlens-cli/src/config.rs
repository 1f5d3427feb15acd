//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use ledgerlens_extractor::{ExtractorConfig, PromptTemplate};
use ledgerlens_gatekeeper::{Gatekeeper, ValidationConfig};
use ledgerlens_grouper::{Grouper, Taxonomy};
use ledgerlens_llm::{ollama, OllamaProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Generation backend
    #[serde(default)]
    pub llm: LlmSettings,

    /// Prompt template source
    #[serde(default)]
    pub prompts: PromptSettings,

    /// Extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Balance check settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Grouping rules; the five-bucket default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<Taxonomy>,
}

/// Ollama connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Ollama base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per request (1 disables retries)
    pub max_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: ollama::DEFAULT_ENDPOINT.to_string(),
            model: "llama3.1:8b".to_string(),
            timeout_secs: ollama::DEFAULT_TIMEOUT_SECS,
            max_retries: ollama::DEFAULT_MAX_RETRIES,
        }
    }
}

/// Where the extraction prompt comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// TOML file with a `[prompts]` table; the built-in template when unset
    pub file: Option<PathBuf>,

    /// Template name within the file
    pub key: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            file: None,
            key: "extract".to_string(),
        }
    }
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ledgerlens").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `~/.ledgerlens/config.toml`
    /// is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match Self::path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CliError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents)?;

        // Relative prompt files are resolved against the config file
        if let (Some(file), Some(dir)) = (config.prompts.file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate()?;
        self.validation.validate()?;
        if let Some(taxonomy) = &self.taxonomy {
            taxonomy.validate()?;
        }
        if self.llm.model.trim().is_empty() {
            return Err(CliError::Config("llm.model must not be empty".into()));
        }
        Ok(())
    }

    /// Ollama provider for the configured endpoint and model.
    pub fn provider(&self) -> Result<OllamaProvider> {
        Ok(
            OllamaProvider::with_timeout(&self.llm.endpoint, &self.llm.model, self.llm.timeout_secs)?
                .with_max_retries(self.llm.max_retries),
        )
    }

    /// Extraction prompt template.
    pub fn prompt_template(&self) -> Result<PromptTemplate> {
        match &self.prompts.file {
            Some(file) => Ok(PromptTemplate::from_file(file, &self.prompts.key)?),
            None => Ok(PromptTemplate::default()),
        }
    }

    /// Grouper for the configured taxonomy.
    pub fn grouper(&self) -> Result<Grouper> {
        Ok(Grouper::new(self.taxonomy.clone().unwrap_or_default())?)
    }

    /// Gatekeeper for the configured balance check.
    pub fn gatekeeper(&self) -> Gatekeeper {
        Gatekeeper::new(self.validation.clone())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.llm.max_retries, 1);
        assert_eq!(config.prompts.key, "extract");
        assert!(config.taxonomy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[llm]
model = "qwen2.5:7b"
timeout_secs = 30

[extractor]
temperature = 0.0

[validation]
balance_tolerance = 0.02
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.llm.model, "qwen2.5:7b");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
        assert_eq!(config.extractor.temperature, 0.0);
        assert_eq!(config.extractor.segmenter.chunk_size, 5000);
        assert_eq!(config.validation.balance_tolerance, 0.02);
        assert_eq!(config.validation.assets_category, "Assets");
    }

    #[test]
    fn test_relative_prompt_file_resolved() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("prompts.toml"),
            "[prompts]\nshort = \"{sections}: {text}\"\n",
        )
        .unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[prompts]\nfile = \"prompts.toml\"\nkey = \"short\"\n").unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.prompts.file, Some(dir.path().join("prompts.toml")));
        let template = config.prompt_template().unwrap();
        assert_eq!(template.render("A", "b"), "A: b");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/ledgerlens.toml")));
        assert!(matches!(result, Err(CliError::File { .. })));
    }

    #[test]
    fn test_invalid_section_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extractor]\nextraction_timeout_secs = 0").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(CliError::Extractor(_))
        ));
    }

    #[test]
    fn test_custom_taxonomy_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[taxonomy]
fallback_category = "Other Indicators"

[[taxonomy.categories]]
name = "Assets"
subcategories = ["Current", "Non-current"]

[[taxonomy.categories]]
name = "Liabilities"
subcategories = ["Current", "Non-current"]

[[taxonomy.categories]]
name = "Equity"

[[taxonomy.categories]]
name = "Income Statement Items"

[[taxonomy.categories]]
name = "Other Indicators"

[[taxonomy.hint_rules]]
pattern = "Aset"
target = "Assets"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        let taxonomy = config.taxonomy.as_ref().unwrap();
        assert_eq!(taxonomy.classify("Aset lancar"), ("Assets", Some("Non-current")));
        assert!(config.grouper().is_ok());
    }
}
