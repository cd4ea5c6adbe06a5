//! `nodeid keystore` - node key pair management.

use anyhow::{bail, Result};
use colored::Colorize;
use nodeid_access::{KeyStoreManager, NodeIdEncoding};
use serde_json::json;

use super::Context;
use crate::cli::args::{KeystoreArgs, KeystoreCommands};

pub async fn execute(ctx: Context, args: KeystoreArgs) -> Result<()> {
    match args.command {
        KeystoreCommands::Generate { cn, force } => generate(&ctx, cn.as_deref(), force).await,
        KeystoreCommands::Show => show(&ctx).await,
        KeystoreCommands::Remove => remove(&ctx).await,
    }
}

async fn generate(ctx: &Context, cn: Option<&str>, force: bool) -> Result<()> {
    let key_store = ctx.config.open_key_store();
    if !force && key_store.has_private_key().await? {
        bail!(
            "key material already exists in {}; use --force to replace it",
            key_store.dir().display()
        );
    }

    let subject = ctx.config.subject.subject_for(cn);
    key_store.generate_and_store_key_pair(&subject).await?;
    println!(
        "{} {} ({})",
        "Generated".green().bold(),
        subject.common_name,
        key_store.dir().display()
    );
    Ok(())
}

async fn show(ctx: &Context) -> Result<()> {
    let key_store = ctx.config.open_key_store();
    if !key_store.has_private_key().await? {
        bail!("no key material in {}", key_store.dir().display());
    }

    let cert = key_store.certificate().await?;
    let summary = cert.summary()?;
    let legacy_id = NodeIdEncoding::node_id_for_certificate(&cert)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "dir": key_store.dir(),
                "certificate": summary,
                "legacy_id": legacy_id,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Node certificate:".bold());
    println!("  {} {}", "subject:".bold(), summary.subject);
    println!("  {} {}", "issuer:".bold(), summary.issuer);
    println!("  {} {}", "serial:".bold(), summary.serial);
    println!("  {} {}", "legacy id:".bold(), legacy_id);
    Ok(())
}

async fn remove(ctx: &Context) -> Result<()> {
    let key_store = ctx.config.open_key_store();
    key_store.remove_private_key().await?;
    println!("{} {}", "Removed".yellow().bold(), key_store.dir().display());
    Ok(())
}
