// ABOUTME: Entry point for the liftlog binary.
// ABOUTME: Loads configuration, initializes tracing, opens the storage backend, and runs one command.

mod cli;
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use liftlog_store::StorageService;

use crate::cli::Cli;
use crate::config::LiftlogConfig;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("liftlog=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = LiftlogConfig::from_env().context("loading configuration")?;
    if let Some(home) = cli.home {
        config.home = home;
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(quota) = cli.quota_bytes {
        config.quota_bytes = Some(quota);
    }

    let backend = config
        .open_backend()
        .with_context(|| format!("opening storage at {}", config.data_path().display()))?;
    let mut service = StorageService::open(backend);

    let mut stdout = std::io::stdout().lock();
    commands::run(&mut service, cli.command, &mut stdout)
}
