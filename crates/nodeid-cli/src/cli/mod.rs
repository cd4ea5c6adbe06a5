//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use nodeid_access::NodeConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().or_else(NodeConfig::default_path);
    let mut config = match &config_path {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!(
        config = ?config_path,
        data_dir = %config.data_dir.display(),
        "loaded configuration"
    );

    let ctx = commands::Context {
        config,
        config_path,
        json: cli.json,
    };

    match cli.command {
        Commands::Id => commands::id::execute(ctx).await,
        Commands::Keystore(args) => commands::keystore::execute(ctx, args).await,
        Commands::Encode(args) => commands::encode::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}

/// Logs go to stderr so stdout stays scriptable.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
