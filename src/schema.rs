//! Column layouts of the three ABA record types.
//!
//! Every rule names a 1-based inclusive column range, how the value is
//! justified and filled, and the pattern the value must satisfy. Both the
//! validator and the encoder read these tables, so widths are declared once.

use crate::transaction_code::CODES;
use serde::Serialize;

/// Width of every record in an ABA file.
pub const RECORD_WIDTH: usize = 120;

/// Inclusive, 1-based column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnRange {
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    pub const fn width(&self) -> usize {
        self.end + 1 - self.start
    }
}

/// How a value occupies its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldKind {
    /// Constant text, independent of input.
    Literal(&'static str),
    /// Reserved; always spaces.
    Blank,
    /// Written as-is; the value must already be exactly as wide as the field.
    Exact,
    /// Right-justified, zero-filled.
    Numeric,
    /// Right-justified, space-filled.
    RightSpace,
    /// Left-justified, space-filled.
    Text,
}

/// Character classes used by [`Pattern::Chars`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// `A-Z`
    Upper,
    /// `A-Z a-z` and space
    Letters,
    /// `A-Z a-z`, space and `+`
    LettersPlus,
    /// `A-Z a-z 0-9`, space and `+`
    AlphanumericPlus,
    /// Printable ASCII including space
    Printable,
}

/// Content rule a field value must satisfy before it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// `NNN-NNN`
    Bsb,
    Digits { min: usize, max: usize },
    Chars { class: CharClass, min: usize, max: usize },
    OneOf { values: &'static [&'static str] },
}

/// One field of a record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub range: ColumnRange,
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub pattern: Option<Pattern>,
    pub expected: &'static str,
}

impl FieldRule {
    pub const fn width(&self) -> usize {
        self.range.width()
    }
}

/// A complete record type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecordLayout {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldRule],
}

impl RecordLayout {
    pub fn width(&self) -> usize {
        self.fields.iter().map(FieldRule::width).sum()
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }
}

macro_rules! field {
    ($start:expr, $end:expr, $name:expr, $label:expr, $kind:expr) => {
        field!($start, $end, $name, $label, $kind, None, "")
    };
    ($start:expr, $end:expr, $name:expr, $label:expr, $kind:expr, $pattern:expr, $expected:expr) => {
        FieldRule {
            range: ColumnRange {
                start: $start,
                end: $end,
            },
            name: $name,
            label: $label,
            kind: $kind,
            pattern: $pattern,
            expected: $expected,
        }
    };
}

const BSB_EXPECTED: &str = "Required format is 000-000.";
const ACCOUNT_EXPECTED: &str = "Must be up to 9 digits only.";

/// Type 0 record: identifies the originator of the batch.
pub mod descriptive {
    use super::*;

    pub const RECORD_TYPE: FieldRule = field!(1, 1, "record type", "Record type", FieldKind::Literal("0"));
    pub const BSB: FieldRule = field!(
        2, 8, "bsb", "Bank/State/Branch number", FieldKind::Exact,
        Some(Pattern::Bsb), BSB_EXPECTED
    );
    pub const ACCOUNT_NUMBER: FieldRule = field!(
        9, 17, "account number", "Account number", FieldKind::RightSpace,
        Some(Pattern::Digits { min: 0, max: 9 }), ACCOUNT_EXPECTED
    );
    pub const RESERVED_ACCOUNT: FieldRule = field!(18, 18, "reserved", "Blank", FieldKind::Blank);
    pub const SEQUENCE: FieldRule = field!(19, 20, "sequence", "Reel sequence number", FieldKind::Literal("01"));
    pub const BANK_NAME: FieldRule = field!(
        21, 23, "bank name", "User financial institution", FieldKind::Exact,
        Some(Pattern::Chars { class: CharClass::Upper, min: 3, max: 3 }),
        "Must be capital letter abbreviation of length 3."
    );
    pub const RESERVED_BANK: FieldRule = field!(24, 30, "reserved", "Blank", FieldKind::Blank);
    pub const USER_NAME: FieldRule = field!(
        31, 56, "user name", "Name of user supplying file", FieldKind::Text,
        Some(Pattern::Chars { class: CharClass::LettersPlus, min: 0, max: 26 }),
        "Must be letters only and up to 26 characters long."
    );
    pub const DIRECT_ENTRY_USER_ID: FieldRule = field!(
        57, 62, "direct entry user ID", "Direct entry user identification number", FieldKind::Exact,
        Some(Pattern::Digits { min: 6, max: 6 }), "Must be 6 digits long."
    );
    pub const DESCRIPTION: FieldRule = field!(
        63, 74, "description", "Description of entries", FieldKind::Text,
        Some(Pattern::Chars { class: CharClass::Letters, min: 0, max: 12 }),
        "Must be letters only and up to 12 characters long."
    );
    pub const PROCESSING_DATE: FieldRule = field!(
        75, 80, "processing date", "Date to be processed (DDMMYY)", FieldKind::Exact
    );
    pub const RESERVED_TAIL: FieldRule = field!(81, 120, "reserved", "Blank", FieldKind::Blank);

    pub const FIELDS: &[FieldRule] = &[
        RECORD_TYPE,
        BSB,
        ACCOUNT_NUMBER,
        RESERVED_ACCOUNT,
        SEQUENCE,
        BANK_NAME,
        RESERVED_BANK,
        USER_NAME,
        DIRECT_ENTRY_USER_ID,
        DESCRIPTION,
        PROCESSING_DATE,
        RESERVED_TAIL,
    ];
}

/// Type 1 record: one per transaction.
pub mod detail {
    use super::*;

    pub const RECORD_TYPE: FieldRule = field!(1, 1, "record type", "Record type", FieldKind::Literal("1"));
    pub const BSB: FieldRule = field!(
        2, 8, "bsb", "Bank/State/Branch number", FieldKind::Exact,
        Some(Pattern::Bsb), BSB_EXPECTED
    );
    pub const ACCOUNT_NUMBER: FieldRule = field!(
        9, 17, "account number", "Account number to be credited/debited", FieldKind::RightSpace,
        Some(Pattern::Digits { min: 0, max: 9 }), ACCOUNT_EXPECTED
    );
    pub const INDICATOR: FieldRule = field!(
        18, 18, "transaction indicator", "Withholding tax indicator", FieldKind::Exact,
        Some(Pattern::OneOf { values: &["", " ", "W", "X", "Y"] }),
        "Must be one of W, X, Y or null."
    );
    pub const TRANSACTION_CODE: FieldRule = field!(
        19, 20, "transaction code", "Transaction code", FieldKind::Exact,
        Some(Pattern::OneOf { values: CODES }),
        "Must be one of 13, 50, 51, 52, 53, 54, 55, 56 or 57."
    );
    pub const AMOUNT: FieldRule = field!(
        21, 30, "amount", "Amount in cents", FieldKind::Numeric,
        Some(Pattern::Digits { min: 1, max: 10 }),
        "Must be expressed in cents, as an unsigned integer, no longer than 10 digits."
    );
    pub const ACCOUNT_NAME: FieldRule = field!(
        31, 62, "account name", "Title of account to be credited/debited", FieldKind::Text,
        Some(Pattern::Chars { class: CharClass::Printable, min: 0, max: 32 }),
        "Cannot exceed 32 printable characters."
    );
    pub const REFERENCE: FieldRule = field!(
        63, 80, "reference", "Lodgement reference", FieldKind::Text,
        Some(Pattern::Chars { class: CharClass::AlphanumericPlus, min: 0, max: 18 }),
        "Must be letters or numbers only and up to 18 characters long."
    );
    pub const TRACE_BSB: FieldRule = field!(81, 87, "trace bsb", "Trace record BSB", FieldKind::Exact);
    pub const TRACE_ACCOUNT_NUMBER: FieldRule = field!(
        88, 96, "trace account number", "Trace record account number", FieldKind::RightSpace
    );
    pub const REMITTER: FieldRule = field!(
        97, 112, "remitter", "Name of remitter", FieldKind::Text,
        Some(Pattern::Chars { class: CharClass::LettersPlus, min: 0, max: 16 }),
        "Must be letters only and up to 16 characters long."
    );
    pub const TAX_WITHHOLDING: FieldRule = field!(
        113, 120, "tax withholding", "Amount of withholding tax in cents", FieldKind::Numeric,
        Some(Pattern::Digits { min: 1, max: 8 }),
        "Must be expressed in cents, as an unsigned integer, no longer than 8 digits."
    );

    pub const FIELDS: &[FieldRule] = &[
        RECORD_TYPE,
        BSB,
        ACCOUNT_NUMBER,
        INDICATOR,
        TRANSACTION_CODE,
        AMOUNT,
        ACCOUNT_NAME,
        REFERENCE,
        TRACE_BSB,
        TRACE_ACCOUNT_NUMBER,
        REMITTER,
        TAX_WITHHOLDING,
    ];
}

/// Type 7 record: batch totals.
pub mod batch_control {
    use super::*;

    pub const RECORD_TYPE: FieldRule = field!(1, 1, "record type", "Record type", FieldKind::Literal("7"));
    pub const BSB_FILLER: FieldRule = field!(2, 8, "bsb", "BSB format filler", FieldKind::Literal("999-999"));
    pub const RESERVED_BSB: FieldRule = field!(9, 20, "reserved", "Blank", FieldKind::Blank);
    pub const NET_TOTAL: FieldRule = field!(21, 30, "net total", "Batch net total amount", FieldKind::Numeric);
    pub const CREDIT_TOTAL: FieldRule = field!(31, 40, "credit total", "Batch credit total amount", FieldKind::Numeric);
    pub const DEBIT_TOTAL: FieldRule = field!(41, 50, "debit total", "Batch debit total amount", FieldKind::Numeric);
    pub const RESERVED_TOTALS: FieldRule = field!(51, 74, "reserved", "Blank", FieldKind::Blank);
    pub const RECORD_COUNT: FieldRule = field!(75, 80, "record count", "Batch total item count", FieldKind::Numeric);
    pub const RESERVED_TAIL: FieldRule = field!(81, 120, "reserved", "Blank", FieldKind::Blank);

    pub const FIELDS: &[FieldRule] = &[
        RECORD_TYPE,
        BSB_FILLER,
        RESERVED_BSB,
        NET_TOTAL,
        CREDIT_TOTAL,
        DEBIT_TOTAL,
        RESERVED_TOTALS,
        RECORD_COUNT,
        RESERVED_TAIL,
    ];
}

pub static DESCRIPTIVE: RecordLayout = RecordLayout {
    name: "descriptive",
    description: "Type 0 header identifying the file originator.",
    fields: descriptive::FIELDS,
};

pub static DETAIL: RecordLayout = RecordLayout {
    name: "detail",
    description: "Type 1 record, one per transaction.",
    fields: detail::FIELDS,
};

pub static BATCH_CONTROL: RecordLayout = RecordLayout {
    name: "batch-control",
    description: "Type 7 trailer carrying batch totals and item count.",
    fields: batch_control::FIELDS,
};

/// Registry of the record layouts, in file order.
pub struct Schema;

impl Schema {
    pub fn layouts() -> [&'static RecordLayout; 3] {
        [&DESCRIPTIVE, &DETAIL, &BATCH_CONTROL]
    }

    /// Resolve a layout by name (case-insensitive).
    pub fn get(name: &str) -> Option<&'static RecordLayout> {
        Self::layouts()
            .into_iter()
            .find(|layout| layout.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_covers_all_columns_without_gaps() {
        for layout in Schema::layouts() {
            let mut next = 1;
            for field in layout.fields {
                assert_eq!(
                    field.range.start, next,
                    "{} field {} starts at the wrong column",
                    layout.name, field.name
                );
                assert!(field.range.end >= field.range.start);
                next = field.range.end + 1;
            }
            assert_eq!(next - 1, RECORD_WIDTH, "{} ends early", layout.name);
            assert_eq!(layout.width(), RECORD_WIDTH);
        }
    }

    #[test]
    fn literal_fields_match_their_width() {
        for layout in Schema::layouts() {
            for field in layout.fields {
                if let FieldKind::Literal(text) = field.kind {
                    assert_eq!(text.len(), field.width(), "{}", field.name);
                }
            }
        }
    }

    #[test]
    fn layouts_resolve_by_name() {
        assert_eq!(Schema::get("DETAIL").map(|l| l.name), Some("detail"));
        assert!(Schema::get("trailer").is_none());
        assert_eq!(
            DETAIL.field("amount").map(|f| f.range),
            Some(ColumnRange { start: 21, end: 30 })
        );
    }
}
