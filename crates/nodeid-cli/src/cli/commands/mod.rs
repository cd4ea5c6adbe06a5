//! Command implementations.

pub mod config;
pub mod encode;
pub mod id;
pub mod keystore;

use nodeid_access::NodeConfig;
use std::path::PathBuf;

/// Shared context for command execution.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration
    pub config: NodeConfig,
    /// Config file consulted, if any
    pub config_path: Option<PathBuf>,
    /// Emit JSON instead of text
    pub json: bool,
}
