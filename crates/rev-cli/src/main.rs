//! Revision CLI
//!
//! Compares and publishes section revisions of JSON documents, keeping
//! per-section versions and the changelog in a state file.

mod cli;
mod commands;
mod error;
mod logging;
mod state;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::publish::PublishPaths;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("failed to initialise logging: {}", e)))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(&cli.config, cmd),
        None => {
            println!("{} Document revision CLI", "rev".green().bold());
            println!();
            println!("Run {} for available commands.", "rev --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(config: &std::path::Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compare {
            document,
            revision,
            json,
        } => commands::run_compare(config, &document, &revision, json),
        Commands::Publish {
            document,
            revision,
            state,
            increments,
            output,
            json,
        } => commands::run_publish(
            PublishPaths {
                config,
                document: &document,
                revision: &revision,
                state: &state,
                output: output.as_deref(),
            },
            &increments,
            json,
        ),
        Commands::Versions { state, json } => commands::run_versions(&state, json),
        Commands::Log {
            state,
            section,
            json,
        } => commands::run_log(&state, section.as_ref(), json),
    }
}
