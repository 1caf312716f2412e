//! Builds ABA files: descriptive record, detail records, batch control record.

use crate::error::{AbaError, FieldError, Result, ValidationError};
use crate::model::{FileHeader, Transaction};
use crate::schema::{FieldKind, FieldRule, RECORD_WIDTH, batch_control, descriptive, detail};
use crate::transaction_code::TransactionCode;
use crate::validate::{validate_header, validate_transaction};
use log::{debug, trace};

/// Line separator between records. The last record has none.
pub const CRLF: &str = "\r\n";

/// Credit and debit sums in cents plus the number of detail records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub credit_total: u64,
    pub debit_total: u64,
    pub records: u64,
}

impl RunningTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// `|credit_total - debit_total|`
    pub fn net_total(&self) -> u64 {
        self.credit_total.abs_diff(self.debit_total)
    }

    /// Count a validated transaction towards the totals.
    pub fn record<T: Transaction + ?Sized>(&mut self, transaction: &T) -> Result<()> {
        let amount: u64 = transaction.amount().parse().map_err(|_| {
            ValidationError::Detail {
                index: None,
                error: FieldError::new(
                    detail::AMOUNT.name,
                    transaction.amount(),
                    detail::AMOUNT.expected,
                ),
            }
        })?;
        let is_debit = TransactionCode::from_code(transaction.transaction_code())
            .is_some_and(TransactionCode::is_debit);
        if is_debit {
            self.debit_total = self
                .debit_total
                .checked_add(amount)
                .ok_or(AbaError::TotalOverflow("debit"))?;
        } else {
            self.credit_total = self
                .credit_total
                .checked_add(amount)
                .ok_or(AbaError::TotalOverflow("credit"))?;
        }
        self.records += 1;
        Ok(())
    }
}

/// Encodes one batch for a borrowed [`FileHeader`].
///
/// The encoder holds no mutable state: totals live inside each
/// [`generate`](AbaEncoder::generate) call, so one encoder can be reused.
#[derive(Debug, Clone, Copy)]
pub struct AbaEncoder<'h> {
    header: &'h FileHeader,
}

impl<'h> AbaEncoder<'h> {
    pub fn new(header: &'h FileHeader) -> Self {
        Self { header }
    }

    /// Validate the header and render the type 0 record.
    pub fn descriptive_record(&self) -> Result<String> {
        validate_header(self.header)?;
        let h = self.header;
        let mut line = Line::new("descriptive");
        line.put(&descriptive::RECORD_TYPE, "")?;
        if h.include_account_number {
            line.put(&descriptive::BSB, &h.bsb)?;
            line.put(&descriptive::ACCOUNT_NUMBER, &h.account_number)?;
        } else {
            line.blank(&descriptive::BSB);
            line.blank(&descriptive::ACCOUNT_NUMBER);
        }
        line.put(&descriptive::RESERVED_ACCOUNT, "")?;
        line.put(&descriptive::SEQUENCE, "")?;
        line.put(&descriptive::BANK_NAME, &h.bank_name)?;
        line.put(&descriptive::RESERVED_BANK, "")?;
        line.put(&descriptive::USER_NAME, &h.user_name)?;
        line.put(&descriptive::DIRECT_ENTRY_USER_ID, &h.direct_entry_user_id)?;
        line.put(&descriptive::DESCRIPTION, &h.description)?;
        let date = h.processing_date.format("%d%m%y").to_string();
        line.put(&descriptive::PROCESSING_DATE, &date)?;
        line.put(&descriptive::RESERVED_TAIL, "")?;
        Ok(line.finish())
    }

    /// Validate a transaction and render its type 1 record.
    ///
    /// The trace fields always carry the header's BSB and account number.
    /// The header remitter is free text, so when it is used as the fallback
    /// it must still be printable ASCII and fit in 16 columns.
    pub fn detail_record<T: Transaction + ?Sized>(&self, transaction: &T) -> Result<String> {
        validate_transaction(transaction)?;
        let h = self.header;
        let indicator = transaction
            .indicator()
            .filter(|i| !i.is_empty())
            .unwrap_or(" ");
        let remitter = transaction
            .remitter()
            .filter(|r| !r.is_empty())
            .unwrap_or(&h.remitter);

        let mut line = Line::new("detail");
        line.put(&detail::RECORD_TYPE, "")?;
        line.put(&detail::BSB, transaction.bsb())?;
        line.put(&detail::ACCOUNT_NUMBER, transaction.account_number())?;
        line.put(&detail::INDICATOR, indicator)?;
        line.put(&detail::TRANSACTION_CODE, transaction.transaction_code())?;
        line.put(&detail::AMOUNT, transaction.amount())?;
        line.put(&detail::ACCOUNT_NAME, transaction.account_name())?;
        line.put(&detail::REFERENCE, transaction.reference())?;
        line.put(&detail::TRACE_BSB, &h.bsb)?;
        line.put(&detail::TRACE_ACCOUNT_NUMBER, &h.account_number)?;
        line.put(&detail::REMITTER, remitter)?;
        line.put(&detail::TAX_WITHHOLDING, transaction.tax_withholding())?;
        Ok(line.finish())
    }

    /// Render the type 7 record for the given totals.
    pub fn batch_control_record(&self, totals: &RunningTotals) -> Result<String> {
        let mut line = Line::new("batch control");
        line.put(&batch_control::RECORD_TYPE, "")?;
        line.put(&batch_control::BSB_FILLER, "")?;
        line.put(&batch_control::RESERVED_BSB, "")?;
        line.put(&batch_control::NET_TOTAL, &totals.net_total().to_string())?;
        line.put(&batch_control::CREDIT_TOTAL, &totals.credit_total.to_string())?;
        line.put(&batch_control::DEBIT_TOTAL, &totals.debit_total.to_string())?;
        line.put(&batch_control::RESERVED_TOTALS, "")?;
        line.put(&batch_control::RECORD_COUNT, &totals.records.to_string())?;
        line.put(&batch_control::RESERVED_TAIL, "")?;
        Ok(line.finish())
    }

    /// Validate and encode the whole batch.
    ///
    /// Returns the CRLF-joined file, or the first error encountered. Nothing
    /// is returned on failure.
    pub fn generate<I>(&self, transactions: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Transaction,
    {
        Ok(self.generate_with_totals(transactions)?.0)
    }

    /// Encode a single transaction as a one-record batch.
    pub fn generate_one<T: Transaction + ?Sized>(&self, transaction: &T) -> Result<String> {
        self.generate(std::iter::once(transaction))
    }

    /// Like [`generate`](AbaEncoder::generate), also returning the totals
    /// written into the batch control record.
    pub fn generate_with_totals<I>(&self, transactions: I) -> Result<(String, RunningTotals)>
    where
        I: IntoIterator,
        I::Item: Transaction,
    {
        let mut lines = vec![self.descriptive_record()?];
        let mut totals = RunningTotals::new();
        for (index, transaction) in transactions.into_iter().enumerate() {
            let line = self
                .detail_record(&transaction)
                .map_err(|err| at_position(err, index))?;
            totals
                .record(&transaction)
                .map_err(|err| at_position(err, index))?;
            trace!("detail record {}: {}", index + 1, line);
            lines.push(line);
        }
        lines.push(self.batch_control_record(&totals)?);
        debug!(
            "encoded {} detail records (credits {}, debits {}, net {})",
            totals.records,
            totals.credit_total,
            totals.debit_total,
            totals.net_total()
        );
        Ok((lines.join(CRLF), totals))
    }
}

fn at_position(err: AbaError, index: usize) -> AbaError {
    match err {
        AbaError::Validation(v) => AbaError::Validation(v.at(index)),
        other => other,
    }
}

/// A record under construction, filled strictly left to right.
struct Line {
    record: &'static str,
    text: String,
}

impl Line {
    fn new(record: &'static str) -> Self {
        Self {
            record,
            text: String::with_capacity(RECORD_WIDTH),
        }
    }

    /// Append a value padded to the rule's width. Values that do not fit are
    /// an error, never truncated.
    ///
    /// Only printable ASCII is written, so one byte is one column.
    fn put(&mut self, rule: &FieldRule, value: &str) -> Result<()> {
        debug_assert_eq!(self.text.len() + 1, rule.range.start, "{}", rule.name);
        let takes_value = !matches!(rule.kind, FieldKind::Literal(_) | FieldKind::Blank);
        if takes_value && !value.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
            return Err(AbaError::Unprintable {
                record: self.record,
                field: rule.name,
                value: value.to_string(),
            });
        }
        let width = rule.width();
        let len = value.len();
        let fits = match rule.kind {
            FieldKind::Literal(_) | FieldKind::Blank => true,
            FieldKind::Exact => len == width,
            FieldKind::Numeric | FieldKind::RightSpace | FieldKind::Text => len <= width,
        };
        if !fits {
            return Err(AbaError::FieldOverflow {
                record: self.record,
                field: rule.name,
                value: value.to_string(),
                width,
            });
        }
        match rule.kind {
            FieldKind::Literal(text) => self.text.push_str(text),
            FieldKind::Blank => self.blank(rule),
            FieldKind::Exact => self.text.push_str(value),
            FieldKind::Numeric => self.text.push_str(&format!("{value:0>width$}")),
            FieldKind::RightSpace => self.text.push_str(&format!("{value:>width$}")),
            FieldKind::Text => self.text.push_str(&format!("{value:<width$}")),
        }
        Ok(())
    }

    fn blank(&mut self, rule: &FieldRule) {
        self.text.extend(std::iter::repeat_n(' ', rule.width()));
    }

    fn finish(self) -> String {
        debug_assert_eq!(self.text.len(), RECORD_WIDTH, "{} record", self.record);
        self.text
    }
}
