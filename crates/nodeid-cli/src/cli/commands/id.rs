//! `nodeid id` - resolve and print the node identity.

use anyhow::{Context as _, Result};
use colored::Colorize;
use nodeid_access::{NodeAccess, Provenance};
use serde::Serialize;
use std::collections::BTreeMap;

use super::Context;

#[derive(Debug, Serialize)]
struct IdReport {
    id: String,
    provenance: Provenance,
    clustered: bool,
    oldest: bool,
    aliases: BTreeMap<String, String>,
}

pub async fn execute(ctx: Context) -> Result<()> {
    let access = ctx.config.local_node_access();
    access
        .start()
        .await
        .context("node identity could not be resolved")?;

    let report = IdReport {
        id: access.id()?.into_string(),
        provenance: access.provenance()?,
        clustered: access.is_clustered()?,
        oldest: access.is_oldest_node()?,
        aliases: access.member_aliases()?.into_iter().collect(),
    };
    access.stop().await;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.id);
    eprintln!(
        "  {} {}  {} {}",
        "provenance:".dimmed(),
        report.provenance,
        "oldest:".dimmed(),
        report.oldest
    );
    Ok(())
}
