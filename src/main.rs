mod chemistry;
mod cli;
mod config;
mod deserialise;
mod download;
mod error;
mod grid;
mod group;
mod logging;
mod parquet;
mod reading;
mod subset;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli::progress().clone())?;

    let config = cli.pipeline_config()?;
    debug!(?config, "Resolved settings");

    let filename = match &cli.command {
        Commands::Fetch { .. } => command::fetch(&config).await?,
        Commands::Surface {} => command::surface(&config)?,
        Commands::Grid {} => command::grid(&config)?,
    };
    println!("File saved to `{}`", filename);

    Ok(())
}
