use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction codes accepted in column 19–20 of a detail record.
///
/// Only [`TransactionCode::ExternallyInitiatedDebit`] counts towards the batch
/// debit total; every other code is a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionCode {
    ExternallyInitiatedDebit,
    ExternallyInitiatedCredit,
    AustralianGovernmentSecurityInterest,
    FamilyAllowance,
    PayrollPayment,
    PensionPayment,
    Allotment,
    Dividend,
    DebentureOrNoteInterest,
}

/// Two-digit codes in declaration order of [`TransactionCode::ALL`].
pub const CODES: &[&str] = &["13", "50", "51", "52", "53", "54", "55", "56", "57"];

impl TransactionCode {
    pub const ALL: [TransactionCode; 9] = [
        TransactionCode::ExternallyInitiatedDebit,
        TransactionCode::ExternallyInitiatedCredit,
        TransactionCode::AustralianGovernmentSecurityInterest,
        TransactionCode::FamilyAllowance,
        TransactionCode::PayrollPayment,
        TransactionCode::PensionPayment,
        TransactionCode::Allotment,
        TransactionCode::Dividend,
        TransactionCode::DebentureOrNoteInterest,
    ];

    /// The two-digit code written into the detail record.
    pub fn code(self) -> &'static str {
        match self {
            TransactionCode::ExternallyInitiatedDebit => "13",
            TransactionCode::ExternallyInitiatedCredit => "50",
            TransactionCode::AustralianGovernmentSecurityInterest => "51",
            TransactionCode::FamilyAllowance => "52",
            TransactionCode::PayrollPayment => "53",
            TransactionCode::PensionPayment => "54",
            TransactionCode::Allotment => "55",
            TransactionCode::Dividend => "56",
            TransactionCode::DebentureOrNoteInterest => "57",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TransactionCode::ExternallyInitiatedDebit => "Externally initiated debit items",
            TransactionCode::ExternallyInitiatedCredit => {
                "Externally initiated credit items with the exception of those bearing codes 51-57"
            }
            TransactionCode::AustralianGovernmentSecurityInterest => {
                "Australian Government Security Interest"
            }
            TransactionCode::FamilyAllowance => "Family Allowance",
            TransactionCode::PayrollPayment => "Pay",
            TransactionCode::PensionPayment => "Pension",
            TransactionCode::Allotment => "Allotment",
            TransactionCode::Dividend => "Dividend",
            TransactionCode::DebentureOrNoteInterest => "Debenture/Note Interest",
        }
    }

    pub fn is_debit(self) -> bool {
        matches!(self, TransactionCode::ExternallyInitiatedDebit)
    }

    /// Resolve a two-digit code, returning `None` for anything outside the set.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tc| tc.code() == code)
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or_else(|| {
            format!(
                "unknown transaction code '{}' (expected one of {})",
                s,
                CODES.join(", ")
            )
        })
    }
}

impl TryFrom<String> for TransactionCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionCode> for String {
    fn from(value: TransactionCode) -> String {
        value.code().to_string()
    }
}
