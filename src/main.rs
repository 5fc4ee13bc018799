mod adapters;
mod cli;
mod config;
mod engine;
mod error;
mod formats;
mod model;
mod registry;
mod report;
mod trace;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ConvertArgs};
use config::SarifizeConfig;
use engine::Converter;
use model::Severity;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays a clean document)
    let filter = if cli.verbose {
        EnvFilter::new("sarifize=debug")
    } else if cli.quiet {
        EnvFilter::new("sarifize=error")
    } else {
        EnvFilter::new("sarifize=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    info!("Sarifize v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        cli::Commands::Convert(args) => convert(args)?,
        cli::Commands::Init => {
            config::init_config()?;
        }
        cli::Commands::ListFormats => {
            formats::list_formats();
        }
    }

    Ok(())
}

fn convert(args: &ConvertArgs) -> Result<()> {
    let config = if args.no_config {
        None
    } else {
        let start = args
            .project_path
            .clone()
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        SarifizeConfig::load(&start)
    };

    // Validate the threshold before doing any work
    let fail_on = match args.fail_on.as_deref() {
        Some(name) => match Severity::from_name(name) {
            Some(level) => Some(level),
            None => bail!("Unknown --fail-on level '{}'. Values: error, warning", name),
        },
        None => None,
    };

    let converter = Converter::new(args, config.as_ref())?;
    let log = converter.run()?;

    let output = config.as_ref().map(|c| &c.output);
    let compact = args.compact || output.is_some_and(|o| o.compact);
    let display = args
        .display
        .clone()
        .or_else(|| output.and_then(|o| o.display.clone()))
        .unwrap_or_else(|| "json".to_string());

    // Output the document (and the summary for --display terminal)
    report::emit(
        &log,
        &display,
        compact,
        args.out.as_deref(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;

    // Exit code based on result levels
    if let Some(threshold) = fail_on {
        if log.has_results_at_or_above(threshold) {
            std::process::exit(1);
        }
    }

    Ok(())
}
