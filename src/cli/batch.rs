//! Batch staging operations (`aba batch ...`).

use std::path::PathBuf;

use aba_file::{
    Batch, DetailTransaction, FileHeader, RunningTotals, TransactionCode, validate_header,
};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use log::warn;

use crate::cli::common::{IndicatorArg, TransactionCodeArg, parse_processing_date};
use crate::cli::utils::{dollars, load_batch};

/// Supported `aba batch` subcommands.
#[derive(Subcommand, Debug)]
pub enum BatchCommand {
    /// Create a batch file holding the descriptive-record values.
    Init(BatchInitArgs),
    /// Append a transaction to a batch.
    Add(BatchAddArgs),
    /// Show the batch header, transactions and totals.
    Show(BatchShowArgs),
}

/// Arguments for `aba batch init`.
#[derive(Args, Debug)]
pub struct BatchInitArgs {
    /// Batch file to create.
    pub batch: PathBuf,
    /// Originating BSB (`000-000`).
    #[arg(long, env = "ABA_BSB")]
    pub bsb: String,
    /// Originating account number.
    #[arg(long, env = "ABA_ACCOUNT_NUMBER")]
    pub account_number: String,
    /// Three-letter bank abbreviation.
    #[arg(long, env = "ABA_BANK_NAME")]
    pub bank_name: String,
    /// Name of the user supplying the file.
    #[arg(long, env = "ABA_USER_NAME")]
    pub user_name: String,
    /// Default remitter shown on recipient statements.
    #[arg(long, env = "ABA_REMITTER")]
    pub remitter: String,
    /// Six-digit direct entry user ID.
    #[arg(long = "de-user-id", env = "ABA_DIRECT_ENTRY_ID")]
    pub direct_entry_user_id: String,
    /// File description, e.g. PAYROLL.
    #[arg(long, env = "ABA_DESCRIPTION")]
    pub description: String,
    /// Processing date (defaults to today).
    #[arg(long, value_parser = parse_processing_date)]
    pub processing_date: Option<NaiveDate>,
    /// Leave BSB and account number out of the descriptive record.
    #[arg(long)]
    pub omit_account_number: bool,
    /// Overwrite an existing batch file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `aba batch add`.
#[derive(Args, Debug)]
pub struct BatchAddArgs {
    /// Batch file to modify.
    pub batch: PathBuf,
    /// Recipient BSB (`000-000`).
    #[arg(long)]
    pub bsb: String,
    #[arg(long)]
    pub account_number: String,
    #[arg(long)]
    pub account_name: String,
    /// Amount in cents.
    #[arg(long)]
    pub amount: u64,
    /// Transaction code, by name or two-digit code.
    #[arg(long, value_enum)]
    pub code: TransactionCodeArg,
    /// Lodgement reference.
    #[arg(long, default_value = "")]
    pub reference: String,
    /// Withholding tax indicator.
    #[arg(long, value_enum, ignore_case = true)]
    pub indicator: Option<IndicatorArg>,
    /// Override the batch remitter for this transaction.
    #[arg(long)]
    pub remitter: Option<String>,
    /// Withholding tax in cents.
    #[arg(long, default_value_t = 0)]
    pub tax_withholding: u64,
}

/// Arguments for `aba batch show`.
#[derive(Args, Debug)]
pub struct BatchShowArgs {
    /// Batch file to read.
    pub batch: PathBuf,
}

/// Execute a batch command.
pub fn handle(command: BatchCommand) -> Result<()> {
    match command {
        BatchCommand::Init(args) => init(args),
        BatchCommand::Add(args) => add(args),
        BatchCommand::Show(args) => show(args),
    }
}

fn init(args: BatchInitArgs) -> Result<()> {
    if args.batch.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists; pass --force to overwrite",
            args.batch.display()
        ));
    }
    let mut file = FileHeader::new(
        args.bsb,
        args.account_number,
        args.bank_name,
        args.user_name,
        args.remitter,
        args.direct_entry_user_id,
        args.description,
    )
    .with_account_number_in_header(!args.omit_account_number);
    if let Some(date) = args.processing_date {
        file = file.with_processing_date(date);
    }
    validate_header(&file).context("header rejected")?;

    let mut batch = Batch::new(file);
    batch.log_action("batch init");
    batch.save(&args.batch)?;
    println!("Created batch {}", args.batch.display());
    Ok(())
}

fn add(args: BatchAddArgs) -> Result<()> {
    let mut batch = load_batch(args.batch.as_path())?;
    let mut tx = DetailTransaction::new(
        args.bsb,
        args.account_number,
        args.account_name,
        args.amount,
        args.code.into(),
        args.reference,
    )
    .with_tax_withholding(args.tax_withholding);
    if let Some(indicator) = args.indicator {
        tx = tx.with_indicator(indicator.as_str());
    }
    if let Some(remitter) = args.remitter {
        tx = tx.with_remitter(remitter);
    }
    let summary = format!(
        "{} {} to {} {}",
        tx.transaction_code,
        dollars(args.amount),
        tx.bsb,
        tx.account_number
    );
    batch.append(tx)?;
    batch.log_action(format!("batch add {summary}"));
    batch.save(&args.batch)?;
    println!(
        "Added transaction #{} ({}) to {}",
        batch.transactions.len(),
        summary,
        args.batch.display()
    );
    Ok(())
}

fn show(args: BatchShowArgs) -> Result<()> {
    let batch = load_batch(args.batch.as_path())?;
    let file = &batch.header.file;
    println!("Batch: {}", args.batch.display());
    println!(
        "  Originator: {} {} ({}) user {} [{}]",
        file.bsb, file.account_number, file.bank_name, file.user_name, file.direct_entry_user_id
    );
    println!("  Remitter: {}", file.remitter);
    println!("  Description: {}", file.description);
    println!("  Processing date: {}", file.processing_date);

    let mut totals = RunningTotals::new();
    for (idx, tx) in batch.transactions.iter().enumerate() {
        let kind = tx
            .code()
            .map(TransactionCode::description)
            .unwrap_or("unknown code");
        println!(
            "  {:>4}  {} {:>9}  {:<32} {:>2} {:>12}  {:<18} {}",
            idx + 1,
            tx.bsb,
            tx.account_number,
            tx.account_name,
            tx.transaction_code,
            tx.amount,
            tx.reference,
            kind
        );
        if let Err(err) = totals.record(tx) {
            warn!("transaction #{} left out of totals: {}", idx + 1, err);
        }
    }
    println!(
        "  {} transactions, credits {}, debits {}, net {}",
        totals.records,
        dollars(totals.credit_total),
        dollars(totals.debit_total),
        dollars(totals.net_total())
    );
    Ok(())
}
