mod collection;
mod render;
mod sync;

use std::path::PathBuf;

use anyhow::Result;
use birthdav_core::config::SyncConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "birthdav")]
#[command(about = "Keep one yearly birthday event per contact in a calendar")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/birthdav/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show what would change without writing to the calendar
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = SyncConfig::load(cli.config.as_deref())?;
    sync::run(&config, cli.dry_run).await
}
