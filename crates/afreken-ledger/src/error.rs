//! Error types for afreken-ledger

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerErrorCode {
    /// Underlying storage failed
    StorageError,
    /// Stored data could not be decoded
    CorruptLedger,
    /// Concurrent writer panicked while holding the lock
    LockPoisoned,
}

impl std::fmt::Display for LedgerErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            LedgerErrorCode::CorruptLedger => write!(f, "CORRUPT_LEDGER"),
            LedgerErrorCode::LockPoisoned => write!(f, "LOCK_POISONED"),
        }
    }
}

/// Main error type for afreken-ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger storage failed: {message}")]
    StorageError { message: String },

    #[error("Ledger file '{path}' could not be decoded: {message}")]
    CorruptLedger { path: String, message: String },

    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Get the error code
    pub fn code(&self) -> LedgerErrorCode {
        match self {
            LedgerError::StorageError { .. } => LedgerErrorCode::StorageError,
            LedgerError::CorruptLedger { .. } => LedgerErrorCode::CorruptLedger,
            LedgerError::LockPoisoned => LedgerErrorCode::LockPoisoned,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::StorageError {
            message: error.to_string(),
        }
    }
}

/// Result type with LedgerError
pub type LedgerResult<T> = Result<T, LedgerError>;
