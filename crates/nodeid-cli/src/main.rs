//! nodeid - node identity operator CLI

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    nodeid_cli::run().await
}
