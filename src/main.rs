//! `aba` binary: stage batches and write ABA direct-entry files.
//!
//! Set `RUST_LOG=debug` to see per-batch encoding details.

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    env_logger::init();
    cli::run(cli::Cli::parse())
}
