//! Command-line interface wiring for the `aba` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod audit;
pub mod batch;
pub mod common;
pub mod generate;
pub mod schema;
pub mod utils;
pub mod validate;

/// Parsed CLI entrypoint for the `aba` binary.
#[derive(Parser, Debug)]
#[command(name = "aba", version, about = "ABA direct-entry file generator")]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(subcommand)]
    Batch(batch::BatchCommand),
    /// Check a batch without writing anything.
    Validate(validate::ValidateArgs),
    /// Write the ABA file for a batch.
    Generate(generate::GenerateArgs),
    #[command(subcommand)]
    Schema(schema::SchemaCommand),
    #[command(subcommand)]
    Audit(audit::AuditCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Batch(cmd) => batch::handle(cmd),
        Command::Validate(args) => validate::handle(args),
        Command::Generate(args) => generate::handle(args),
        Command::Schema(cmd) => schema::handle(cmd),
        Command::Audit(cmd) => audit::handle(cmd),
    }
}
