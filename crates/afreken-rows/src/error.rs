//! Error types for afreken-rows

use thiserror::Error;

/// Row decoding error.
///
/// All variants are non-fatal at the batch level: the offending row is
/// skipped with a warning and the run continues (see the run driver in
/// afreken-core).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Unrecognized row kind '{discriminator}'")]
    UnrecognizedRowKind { discriminator: String },

    #[error("Row too short: expected at least {expected} columns, got {actual}")]
    RowTooShort { expected: usize, actual: usize },

    #[error("Missing value for field '{field}'")]
    MissingField { field: String },

    #[error("Cell for field '{field}' is not a number: '{value}'")]
    NotANumber { field: String, value: String },

    #[error("Cell for field '{field}' is not a date: '{value}'")]
    NotADate { field: String, value: String },

    #[error("VAT rate out of range: '{value}'")]
    InvalidVatRate { value: String },

    #[error("Unknown named field '{name}' in legacy input")]
    UnknownNamedField { name: String },
}

impl RowError {
    /// Stable error code for run reports.
    pub fn code(&self) -> &'static str {
        match self {
            RowError::UnrecognizedRowKind { .. } => "UNRECOGNIZED_ROW_KIND",
            RowError::RowTooShort { .. } => "ROW_TOO_SHORT",
            RowError::MissingField { .. } => "MISSING_FIELD",
            RowError::NotANumber { .. } => "NOT_A_NUMBER",
            RowError::NotADate { .. } => "NOT_A_DATE",
            RowError::InvalidVatRate { .. } => "INVALID_VAT_RATE",
            RowError::UnknownNamedField { .. } => "UNKNOWN_NAMED_FIELD",
        }
    }
}

/// Result type with RowError
pub type RowResult<T> = Result<T, RowError>;
