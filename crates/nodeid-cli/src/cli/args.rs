//! Command-line argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve and inspect this node's cluster identity.
///
/// The identity is read from the node id store, migrated from an existing
/// node certificate, or generated, in that order.
#[derive(Parser, Debug)]
#[command(name = "nodeid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: platform config dir, nodeid/config.toml)
    #[arg(short, long, env = "NODEID_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the data directory from the config file
    #[arg(long, env = "NODEID_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the node identity (persisting it on first run) and print it
    Id,

    /// Manage the node key pair
    Keystore(KeystoreArgs),

    /// Print the legacy identity derived from a PEM certificate
    Encode(EncodeArgs),

    /// Show effective configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct KeystoreArgs {
    #[command(subcommand)]
    pub command: KeystoreCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeystoreCommands {
    /// Generate a key pair and self-signed certificate
    Generate {
        /// Certificate common name (default: random UUID)
        #[arg(long)]
        cn: Option<String>,

        /// Replace existing key material
        #[arg(long)]
        force: bool,
    },

    /// Describe the stored certificate
    Show,

    /// Delete the stored key pair
    Remove,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// PEM certificate file
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path in use
    Path,
}
