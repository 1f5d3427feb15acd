//! Ledgerlens CLI - Command-line interface for the financial statement pipeline.

use clap::Parser;
use ledgerlens_cli::commands;
use ledgerlens_cli::logging::init_tracing;
use ledgerlens_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ledgerlens_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await?,
        Command::Group(args) => commands::execute_group(args, &config, &formatter)?,
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter)?,
        Command::Compare(args) => commands::execute_compare(args, &formatter)?,
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
    }

    Ok(())
}
