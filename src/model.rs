//! Inputs to a generation run: the file-level header and the transactions.

use crate::error::AbaError;
use crate::transaction_code::TransactionCode;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Values written into the descriptive record and reused as trace fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub bsb: String,
    pub account_number: String,
    /// Three-letter abbreviation of the originating financial institution.
    pub bank_name: String,
    /// Some banks require this to match the account holder, or `SURNAME Firstname`.
    pub user_name: String,
    /// Appears on the recipient's statement unless a transaction overrides it.
    pub remitter: String,
    pub direct_entry_user_id: String,
    pub description: String,
    /// Date the transactions are released to all financial institutions.
    #[serde(default = "today")]
    pub processing_date: NaiveDate,
    /// Write BSB and account number into columns 2–18 of the descriptive
    /// record. Some banks require these columns blank.
    #[serde(default = "default_true")]
    pub include_account_number: bool,
}

impl FileHeader {
    /// Build a header processed today that includes the account number.
    pub fn new<S: Into<String>>(
        bsb: S,
        account_number: S,
        bank_name: S,
        user_name: S,
        remitter: S,
        direct_entry_user_id: S,
        description: S,
    ) -> Self {
        Self {
            bsb: bsb.into(),
            account_number: account_number.into(),
            bank_name: bank_name.into(),
            user_name: user_name.into(),
            remitter: remitter.into(),
            direct_entry_user_id: direct_entry_user_id.into(),
            description: description.into(),
            processing_date: today(),
            include_account_number: true,
        }
    }

    pub fn with_processing_date<D: Into<ProcessingDate>>(mut self, date: D) -> Self {
        self.processing_date = date.into().0;
        self
    }

    pub fn with_account_number_in_header(mut self, include: bool) -> Self {
        self.include_account_number = include;
        self
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn default_true() -> bool {
    true
}

/// A processing date normalised to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingDate(pub NaiveDate);

impl ProcessingDate {
    /// Interpret a Unix timestamp (seconds) in the local timezone.
    pub fn from_timestamp(secs: i64) -> Result<Self, AbaError> {
        Local
            .timestamp_opt(secs, 0)
            .single()
            .map(|dt| Self(dt.date_naive()))
            .ok_or_else(|| AbaError::ProcessingDate {
                input: secs.to_string(),
                reason: "timestamp out of range".to_string(),
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ProcessingDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ProcessingDate {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.date_naive())
    }
}

impl FromStr for ProcessingDate {
    type Err = AbaError;

    /// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, `DDMMYY`, RFC 3339 or a Unix timestamp.
    ///
    /// Exactly six digits always read as `DDMMYY`, the date format of the
    /// record itself, so `"050324"` is 5 March 2024 and not 50324 seconds
    /// after the epoch. Timestamps of six digits fall in January 1970 and
    /// can still be passed through [`ProcessingDate::from_timestamp`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let all_digits = !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit());
        if all_digits && input.len() != 6 {
            let secs: i64 = input.parse().map_err(|_| AbaError::ProcessingDate {
                input: s.to_string(),
                reason: "timestamp out of range".to_string(),
            })?;
            return Self::from_timestamp(secs);
        }
        for format in ["%Y-%m-%d", "%d/%m/%Y", "%d%m%y"] {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return Ok(Self(date));
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.into());
        }
        Err(AbaError::ProcessingDate {
            input: s.to_string(),
            reason: "expected YYYY-MM-DD, DD/MM/YYYY, DDMMYY, RFC 3339 or a Unix timestamp"
                .to_string(),
        })
    }
}

/// Read access the encoder needs from a transaction.
///
/// Amounts are decimal digit strings in cents. An indicator or remitter of
/// `None` means "not set"; the remitter then falls back to the header's.
pub trait Transaction {
    fn account_name(&self) -> &str;
    fn account_number(&self) -> &str;
    fn bsb(&self) -> &str;
    fn amount(&self) -> &str;
    /// `W`, `X` or `Y` when withholding tax applies.
    fn indicator(&self) -> Option<&str>;
    fn transaction_code(&self) -> &str;
    /// Lodgement reference shown on the recipient's statement.
    fn reference(&self) -> &str;
    fn remitter(&self) -> Option<&str>;
    fn tax_withholding(&self) -> &str {
        "0"
    }
}

impl<T: Transaction + ?Sized> Transaction for &T {
    fn account_name(&self) -> &str {
        (**self).account_name()
    }
    fn account_number(&self) -> &str {
        (**self).account_number()
    }
    fn bsb(&self) -> &str {
        (**self).bsb()
    }
    fn amount(&self) -> &str {
        (**self).amount()
    }
    fn indicator(&self) -> Option<&str> {
        (**self).indicator()
    }
    fn transaction_code(&self) -> &str {
        (**self).transaction_code()
    }
    fn reference(&self) -> &str {
        (**self).reference()
    }
    fn remitter(&self) -> Option<&str> {
        (**self).remitter()
    }
    fn tax_withholding(&self) -> &str {
        (**self).tax_withholding()
    }
}

impl<T: Transaction + ?Sized> Transaction for Box<T> {
    fn account_name(&self) -> &str {
        (**self).account_name()
    }
    fn account_number(&self) -> &str {
        (**self).account_number()
    }
    fn bsb(&self) -> &str {
        (**self).bsb()
    }
    fn amount(&self) -> &str {
        (**self).amount()
    }
    fn indicator(&self) -> Option<&str> {
        (**self).indicator()
    }
    fn transaction_code(&self) -> &str {
        (**self).transaction_code()
    }
    fn reference(&self) -> &str {
        (**self).reference()
    }
    fn remitter(&self) -> Option<&str> {
        (**self).remitter()
    }
    fn tax_withholding(&self) -> &str {
        (**self).tax_withholding()
    }
}

/// Immutable transaction value stored in batch files.
///
/// Fields are kept as text so that malformed input survives deserialisation
/// and is reported by the validator with its original value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailTransaction {
    pub bsb: String,
    pub account_number: String,
    pub account_name: String,
    #[serde(deserialize_with = "cents")]
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator: Option<String>,
    pub transaction_code: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remitter: Option<String>,
    #[serde(default = "zero_cents", deserialize_with = "cents")]
    pub tax_withholding: String,
}

impl DetailTransaction {
    pub fn new<S: Into<String>>(
        bsb: S,
        account_number: S,
        account_name: S,
        amount_cents: u64,
        code: TransactionCode,
        reference: S,
    ) -> Self {
        Self {
            bsb: bsb.into(),
            account_number: account_number.into(),
            account_name: account_name.into(),
            amount: amount_cents.to_string(),
            indicator: None,
            transaction_code: code.code().to_string(),
            reference: reference.into(),
            remitter: None,
            tax_withholding: zero_cents(),
        }
    }

    pub fn with_indicator<S: Into<String>>(mut self, indicator: S) -> Self {
        self.indicator = Some(indicator.into());
        self
    }

    pub fn with_remitter<S: Into<String>>(mut self, remitter: S) -> Self {
        self.remitter = Some(remitter.into());
        self
    }

    pub fn with_tax_withholding(mut self, cents: u64) -> Self {
        self.tax_withholding = cents.to_string();
        self
    }

    /// Parsed transaction code, if it is one of the known codes.
    pub fn code(&self) -> Option<TransactionCode> {
        TransactionCode::from_code(&self.transaction_code)
    }
}

impl Transaction for DetailTransaction {
    fn account_name(&self) -> &str {
        &self.account_name
    }
    fn account_number(&self) -> &str {
        &self.account_number
    }
    fn bsb(&self) -> &str {
        &self.bsb
    }
    fn amount(&self) -> &str {
        &self.amount
    }
    fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }
    fn transaction_code(&self) -> &str {
        &self.transaction_code
    }
    fn reference(&self) -> &str {
        &self.reference
    }
    fn remitter(&self) -> Option<&str> {
        self.remitter.as_deref()
    }
    fn tax_withholding(&self) -> &str {
        &self.tax_withholding
    }
}

fn zero_cents() -> String {
    "0".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Cents {
    Number(u64),
    Text(String),
}

/// Accept cents either as a JSON number or as a digit string.
fn cents<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Cents::deserialize(deserializer)? {
        Cents::Number(n) => n.to_string(),
        Cents::Text(s) => s,
    })
}
