//! pdfutils - Merge, split and compress PDF files.
//!
//! Starts the interactive session, or runs a single operation when a
//! subcommand is given.

mod app;
mod cli;
mod picker;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command};
use pdfutils::config::Config;
use pdfutils::manifest::FileManifest;
use pdfutils::ops::{Executor, OperationRequest, OperationResult};
use pdfutils::output::{Notice, OutputFormatter, display_import_outcome};
use pdfutils::{PdfUtilsError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr. `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pdfutils=debug"
    } else {
        "pdfutils=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let config = cli.to_config()?;
    let formatter = OutputFormatter::from_config(&config);

    if cli.is_interactive() {
        let app = App::new(config, formatter).await?;
        app.run().await?;
        return Ok(());
    }

    if let Some(command) = &cli.command {
        let result = run_command(command, &config, &formatter, cli.json).await?;
        if cli.json {
            print_json(&result)?;
        }
    }
    Ok(())
}

/// Run one operation over the files named on the command line.
async fn run_command(
    command: &Command,
    config: &Config,
    formatter: &OutputFormatter,
    json: bool,
) -> Result<OperationResult> {
    let outcome = FileManifest::import(command.inputs()).await;
    if !json {
        display_import_outcome(formatter, &outcome);
    }
    if let Some(rejected) = outcome.rejected.into_iter().next() {
        return Err(rejected.error);
    }

    let request = OperationRequest::new(command.operation(config.compression), outcome.manifest);
    let executor = Executor::from_config(config);
    let result = executor.execute(&request).await?;

    if !json {
        formatter.notice(&Notice::completed(&result, executor.workdir()));
        formatter.operation_details(&result);
    }

    Ok(result)
}

fn print_json(result: &OperationResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|err| PdfUtilsError::other(format!("Failed to encode result: {err}")))?;
    println!("{json}");
    Ok(())
}
