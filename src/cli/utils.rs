//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use aba_file::Batch;
use anyhow::{Context, Result};

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if is_stdout(path) {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Default location of the generated file for a batch.
pub fn aba_output_path(batch: &Path) -> PathBuf {
    let mut path = batch.to_path_buf();
    path.set_extension("aba");
    path
}

/// Load a batch file, attaching path context to any error.
pub fn load_batch(path: &Path) -> Result<Batch> {
    Batch::load(path).with_context(|| format!("failed to read batch {}", path.display()))
}

/// Format cents as dollars for human-readable summaries.
pub fn dollars(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
