//! Pre-flight checks (`aba validate ...`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use log::{info, warn};

use crate::cli::utils::load_batch;

/// Arguments for `aba validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Batch file to check.
    pub batch: PathBuf,
}

/// Report every invalid record instead of stopping at the first one.
pub fn handle(args: ValidateArgs) -> Result<()> {
    let batch = load_batch(args.batch.as_path())?;
    let problems = batch.problems();
    for problem in &problems {
        warn!("{}", problem);
        println!("{}", problem);
    }
    if !problems.is_empty() {
        return Err(anyhow!(
            "{} invalid record(s) in {}",
            problems.len(),
            args.batch.display()
        ));
    }
    // Field checks passed; totals can still overflow their columns.
    let (_, totals) = batch.encode()?;
    info!(
        "validated {} with {} transactions",
        args.batch.display(),
        totals.records
    );
    println!(
        "{} is valid: {} transactions",
        args.batch.display(),
        totals.records
    );
    Ok(())
}
