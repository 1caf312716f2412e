//! Error types for record validation and encoding.

use thiserror::Error;

/// A single field that failed its format rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is invalid: {value:?}. {expected}")]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl FieldError {
    pub fn new<S: Into<String>>(field: &'static str, value: S, expected: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            expected,
        }
    }
}

/// Rejection of a descriptive record or a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("descriptive record {0}")]
    Header(FieldError),

    #[error("detail record{}: {error}", index.map(|i| format!(" #{}", i + 1)).unwrap_or_default())]
    Detail {
        /// Zero-based position in the input sequence, when known.
        index: Option<usize>,
        error: FieldError,
    },
}

impl ValidationError {
    pub fn field(&self) -> &FieldError {
        match self {
            ValidationError::Header(error) => error,
            ValidationError::Detail { error, .. } => error,
        }
    }

    /// Attach the transaction position to a detail failure.
    pub fn at(self, position: usize) -> Self {
        match self {
            ValidationError::Detail { error, .. } => ValidationError::Detail {
                index: Some(position),
                error,
            },
            other => other,
        }
    }
}

/// Errors produced while building an ABA file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{record} record {field} {value:?} does not fit in {width} columns")]
    FieldOverflow {
        record: &'static str,
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("{record} record {field} {value:?} contains characters outside printable ASCII")]
    Unprintable {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0} total overflowed while adding transaction amounts")]
    TotalOverflow(&'static str),

    #[error("invalid processing date {input:?}: {reason}")]
    ProcessingDate { input: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AbaError>;
