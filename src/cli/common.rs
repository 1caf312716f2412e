//! Shared clap helper types for CLI commands.

use aba_file::{ProcessingDate, TransactionCode};
use chrono::NaiveDate;
use clap::ValueEnum;

/// Transaction codes accepted by `--code`, by name or two-digit code.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TransactionCodeArg {
    #[value(alias = "13")]
    Debit,
    #[value(alias = "50")]
    Credit,
    #[value(name = "government-security-interest", alias = "51")]
    GovernmentSecurityInterest,
    #[value(alias = "52")]
    FamilyAllowance,
    #[value(alias = "53")]
    Payroll,
    #[value(alias = "54")]
    Pension,
    #[value(alias = "55")]
    Allotment,
    #[value(alias = "56")]
    Dividend,
    #[value(name = "debenture-interest", alias = "57")]
    DebentureInterest,
}

impl From<TransactionCodeArg> for TransactionCode {
    fn from(value: TransactionCodeArg) -> TransactionCode {
        match value {
            TransactionCodeArg::Debit => TransactionCode::ExternallyInitiatedDebit,
            TransactionCodeArg::Credit => TransactionCode::ExternallyInitiatedCredit,
            TransactionCodeArg::GovernmentSecurityInterest => {
                TransactionCode::AustralianGovernmentSecurityInterest
            }
            TransactionCodeArg::FamilyAllowance => TransactionCode::FamilyAllowance,
            TransactionCodeArg::Payroll => TransactionCode::PayrollPayment,
            TransactionCodeArg::Pension => TransactionCode::PensionPayment,
            TransactionCodeArg::Allotment => TransactionCode::Allotment,
            TransactionCodeArg::Dividend => TransactionCode::Dividend,
            TransactionCodeArg::DebentureInterest => TransactionCode::DebentureOrNoteInterest,
        }
    }
}

/// Withholding tax indicators.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum IndicatorArg {
    /// Dividend paid to a resident of a country with a double tax agreement.
    W,
    /// Dividend paid to a resident of any other country.
    X,
    /// Interest paid to all non-residents.
    Y,
}

impl IndicatorArg {
    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorArg::W => "W",
            IndicatorArg::X => "X",
            IndicatorArg::Y => "Y",
        }
    }
}

/// Clap-friendly processing date parser.
pub fn parse_processing_date(input: &str) -> Result<NaiveDate, String> {
    input
        .parse::<ProcessingDate>()
        .map(|date| date.date())
        .map_err(|err| err.to_string())
}
