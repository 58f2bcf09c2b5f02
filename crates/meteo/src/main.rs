//! meteo - entry point
//!
//! Binary entry point for the weather-monitoring platform simulation.

use clap::Parser;

/// Command line interface for the meteo platform
#[derive(Parser, Debug)]
#[command(name = "meteo")]
#[command(about = "Weather-monitoring platform simulation")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Run a single cycle and exit instead of scheduling periodic tasks
    #[arg(long)]
    pub once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    meteo::run(cli.config.as_deref(), cli.once).await?;
    Ok(())
}
