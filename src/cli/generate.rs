//! File generation (`aba generate ...`).

use std::path::PathBuf;

use aba_file::file_digest;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use log::info;

use crate::cli::common::parse_processing_date;
use crate::cli::utils::{aba_output_path, dollars, is_stdout, load_batch, write_output};

/// Arguments for `aba generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Batch file to encode.
    pub batch: PathBuf,
    /// Output file (`-` for stdout); defaults to the batch path with `.aba`.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// Override the processing date stored in the batch.
    #[arg(long, value_parser = parse_processing_date)]
    pub processing_date: Option<NaiveDate>,
}

pub fn handle(args: GenerateArgs) -> Result<()> {
    let mut batch = load_batch(args.batch.as_path())?;
    if let Some(date) = args.processing_date {
        batch.header.file.processing_date = date;
    }
    let (contents, totals) = batch
        .encode()
        .with_context(|| format!("cannot generate ABA file from {}", args.batch.display()))?;

    let output = args
        .output
        .unwrap_or_else(|| aba_output_path(&args.batch));
    write_output(&output, &contents)?;

    let digest = file_digest(&contents);
    info!("wrote {} (sha256 {})", output.display(), digest);
    batch.log_action(format!(
        "generate {} records={} net={} sha256={}",
        output.display(),
        totals.records,
        totals.net_total(),
        digest
    ));
    batch.save(&args.batch)?;

    if !is_stdout(&output) {
        println!(
            "Wrote {} transactions to {} (credits {}, debits {}, net {})",
            totals.records,
            output.display(),
            dollars(totals.credit_total),
            dollars(totals.debit_total),
            dollars(totals.net_total())
        );
    }
    Ok(())
}
