//! Audit and hashing commands (`aba audit ...`).

use std::path::PathBuf;

use crate::cli::utils::load_batch;
use aba_file::file_digest;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

/// Audit subcommands.
#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// Compute the SHA-256 hash of a generated file.
    Hash(AuditHashArgs),
    /// Show audited history events of a batch.
    Log(AuditLogArgs),
}

/// Arguments for `aba audit hash`.
#[derive(Args, Debug)]
pub struct AuditHashArgs {
    /// File to hash.
    pub file: PathBuf,
}

/// Arguments for `aba audit log`.
#[derive(Args, Debug)]
pub struct AuditLogArgs {
    /// Batch file to inspect.
    pub batch: PathBuf,
    /// Only show events whose action starts with this command, e.g. `generate`.
    #[arg(long)]
    pub action: Option<String>,
}

/// Execute an audit command.
pub fn handle(command: AuditCommand) -> Result<()> {
    match command {
        AuditCommand::Hash(args) => hash(args),
        AuditCommand::Log(args) => log(args),
    }
}

fn hash(args: AuditHashArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    println!("{}", file_digest(&contents));
    Ok(())
}

fn log(args: AuditLogArgs) -> Result<()> {
    let batch = load_batch(args.batch.as_path())?;
    let events: Vec<_> = batch
        .header
        .history
        .iter()
        .filter(|event| {
            args.action
                .as_deref()
                .is_none_or(|prefix| event.action.starts_with(prefix))
        })
        .collect();
    println!(
        "{}: batch created {}, {} of {} events",
        args.batch.display(),
        batch.header.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        events.len(),
        batch.header.history.len()
    );
    for event in events {
        println!(
            "  {}  {:<12} {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.actor,
            event.action
        );
    }
    Ok(())
}
