//! Extract command implementation.

use super::{read_text, source_name, write_json};
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ledgerlens_domain::traits::LlmProvider;
use ledgerlens_domain::{ExtractionReport, RawDocument};
use ledgerlens_extractor::Extractor;
use std::fmt::Display;
use std::path::Path;
use tracing::info;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let config = apply_overrides(config, &args)?;
    let provider = config.provider()?;

    let report = extract_to_file(provider, &config, &args.input, &args.output).await?;

    println!("{}", formatter.format_extraction(&report, &args.output)?);
    Ok(())
}

/// Configuration with the command-line model, endpoint and temperature applied.
pub fn apply_overrides(config: &Config, args: &ExtractArgs) -> Result<Config> {
    let mut config = config.clone();
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(endpoint) = &args.endpoint {
        config.llm.endpoint = endpoint.clone();
    }
    if let Some(temperature) = args.temperature {
        config.extractor.temperature = temperature;
    }
    config.validate()?;
    Ok(config)
}

/// Extract `input` with `provider` and write the report to `output`.
pub async fn extract_to_file<L>(
    provider: L,
    config: &Config,
    input: &Path,
    output: &Path,
) -> Result<ExtractionReport>
where
    L: LlmProvider + Sync,
    L::Error: Display,
{
    let text = read_text(input)?;
    let document = RawDocument::new(text);
    info!(
        "Loaded {} ({} pages, {} chars)",
        input.display(),
        document.page_count(),
        document.char_len()
    );

    let extractor = Extractor::new(provider, config.prompt_template()?, config.extractor.clone())?;
    let report = extractor
        .extract_document(&source_name(input), &document)
        .await?;

    write_json(output, &report)?;
    Ok(report)
}
