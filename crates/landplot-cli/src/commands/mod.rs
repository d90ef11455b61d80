//! Command implementations

mod config;
mod export;
mod import;
mod metrics;

use crate::cli::{Cli, Commands};
use crate::config_loader::{cli_overrides, load_config};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), cli_overrides(&cli)?)?;

    match cli.command {
        Commands::Metrics(args) => metrics::execute(args, &output),
        Commands::Export(args) => export::execute(args, &config, &output),
        Commands::Import(args) => import::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
