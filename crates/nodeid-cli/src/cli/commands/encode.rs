//! `nodeid encode` - legacy identity of a certificate file.

use anyhow::{Context as _, Result};
use nodeid_access::{NodeCertificate, NodeIdEncoding};
use serde_json::json;

use super::Context;
use crate::cli::args::EncodeArgs;

pub async fn execute(ctx: Context, args: EncodeArgs) -> Result<()> {
    let pem = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let cert = NodeCertificate::from_pem(pem)?;
    let id = NodeIdEncoding::node_id_for_certificate(&cert)?;

    if ctx.json {
        let summary = cert.summary()?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "id": id,
                "subject": summary.subject,
                "serial": summary.serial,
            }))?
        );
    } else {
        println!("{id}");
    }
    Ok(())
}
