//! Field checks for descriptive records and transactions.
//!
//! Each check reads the [`Pattern`] of the matching schema rule, so the
//! accepted input and the rendered column width come from one table.

use crate::error::{FieldError, ValidationError};
use crate::model::{FileHeader, Transaction};
use crate::schema::{CharClass, FieldRule, Pattern, descriptive, detail};

/// Check every descriptive-record field, stopping at the first failure.
pub fn validate_header(header: &FileHeader) -> Result<(), ValidationError> {
    let checks: [(&FieldRule, &str); 6] = [
        (&descriptive::BSB, header.bsb.as_str()),
        (&descriptive::ACCOUNT_NUMBER, header.account_number.as_str()),
        (&descriptive::BANK_NAME, header.bank_name.as_str()),
        (&descriptive::USER_NAME, header.user_name.as_str()),
        (&descriptive::DIRECT_ENTRY_USER_ID, header.direct_entry_user_id.as_str()),
        (&descriptive::DESCRIPTION, header.description.as_str()),
    ];
    for (rule, value) in checks {
        check(rule, value).map_err(ValidationError::Header)?;
    }
    Ok(())
}

/// Check every transaction field, stopping at the first failure.
///
/// The indicator and remitter are only checked when present; an empty
/// remitter counts as absent because it falls back to the header's.
pub fn validate_transaction<T: Transaction + ?Sized>(
    transaction: &T,
) -> Result<(), ValidationError> {
    let detail_err = |error| ValidationError::Detail { index: None, error };

    check(&detail::BSB, transaction.bsb()).map_err(detail_err)?;
    check(&detail::ACCOUNT_NUMBER, transaction.account_number()).map_err(detail_err)?;
    if let Some(indicator) = transaction.indicator() {
        check(&detail::INDICATOR, indicator).map_err(detail_err)?;
    }
    check(&detail::AMOUNT, transaction.amount()).map_err(detail_err)?;
    check(&detail::ACCOUNT_NAME, transaction.account_name()).map_err(detail_err)?;
    check(&detail::REFERENCE, transaction.reference()).map_err(detail_err)?;
    if let Some(remitter) = transaction.remitter().filter(|r| !r.is_empty()) {
        check(&detail::REMITTER, remitter).map_err(detail_err)?;
    }
    check(&detail::TRANSACTION_CODE, transaction.transaction_code()).map_err(detail_err)?;
    check(&detail::TAX_WITHHOLDING, transaction.tax_withholding()).map_err(detail_err)?;
    Ok(())
}

/// Test a single value against a rule's pattern.
pub fn check(rule: &FieldRule, value: &str) -> Result<(), FieldError> {
    match rule.pattern {
        Some(pattern) if !matches(pattern, value) => {
            Err(FieldError::new(rule.name, value, rule.expected))
        }
        _ => Ok(()),
    }
}

pub fn matches(pattern: Pattern, value: &str) -> bool {
    match pattern {
        Pattern::Bsb => is_bsb(value),
        Pattern::Digits { min, max } => {
            within(value, min, max) && value.bytes().all(|b| b.is_ascii_digit())
        }
        Pattern::Chars { class, min, max } => {
            within(value, min, max) && value.chars().all(|ch| in_class(class, ch))
        }
        Pattern::OneOf { values } => values.contains(&value),
    }
}

fn is_bsb(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[3] == b'-'
        && bytes[..3].iter().chain(&bytes[4..]).all(u8::is_ascii_digit)
}

fn within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

fn in_class(class: CharClass, ch: char) -> bool {
    match class {
        CharClass::Upper => ch.is_ascii_uppercase(),
        CharClass::Letters => ch.is_ascii_alphabetic() || ch == ' ',
        CharClass::LettersPlus => ch.is_ascii_alphabetic() || ch == ' ' || ch == '+',
        CharClass::AlphanumericPlus => ch.is_ascii_alphanumeric() || ch == ' ' || ch == '+',
        CharClass::Printable => ch.is_ascii_graphic() || ch == ' ',
    }
}
