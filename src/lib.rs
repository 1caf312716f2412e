//! Core library for generating ABA direct-entry files.
//!
//! An ABA file is a descriptive record, one detail record per transaction and
//! a batch control record, each exactly 120 columns, joined with CRLF.

mod batch;
mod encoder;
mod error;
mod model;
pub mod schema;
mod transaction_code;
mod validate;

pub use batch::{AuditEvent, Batch, BatchHeader, file_digest};
pub use encoder::{AbaEncoder, CRLF, RunningTotals};
pub use error::{AbaError, FieldError, Result, ValidationError};
pub use model::{DetailTransaction, FileHeader, ProcessingDate, Transaction};
pub use transaction_code::{CODES, TransactionCode};
pub use validate::{validate_header, validate_transaction};

/// Validate and encode a header plus transactions into the text of an ABA file.
pub fn generate_aba_file<I>(header: &FileHeader, transactions: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: Transaction,
{
    AbaEncoder::new(header).generate(transactions)
}
