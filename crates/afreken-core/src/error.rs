//! Error types for afreken-core
//!
//! Failures are layered: per-booking errors exclude one booking and
//! let the batch continue, batch errors abort the whole run. Nothing
//! here is thrown past the run driver; it is collected into the run
//! report instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineErrorCode {
    /// Booking has no header row
    IncompleteBooking,
    /// Advance amount fails validation
    InvalidAdvance,
    /// Check-out does not follow check-in
    InvalidPeriod,
    /// Batch input unusable as a whole
    InvalidBatch,
}

impl std::fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineErrorCode::IncompleteBooking => write!(f, "INCOMPLETE_BOOKING"),
            EngineErrorCode::InvalidAdvance => write!(f, "INVALID_ADVANCE"),
            EngineErrorCode::InvalidPeriod => write!(f, "INVALID_PERIOD"),
            EngineErrorCode::InvalidBatch => write!(f, "INVALID_BATCH"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineErrorSeverity {
    /// One booking excluded, batch continues
    Error,
    /// Whole run aborted
    Critical,
}

impl std::fmt::Display for EngineErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineErrorSeverity::Error => write!(f, "error"),
            EngineErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for afreken-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Booking '{address}' has no header row")]
    IncompleteBooking { address: String },

    #[error("Booking '{address}': advance '{field}' is invalid: {value}")]
    InvalidAdvance {
        address: String,
        field: String,
        value: String,
    },

    #[error("Booking '{address}': check-out {check_out} does not follow check-in {check_in}")]
    InvalidPeriod {
        address: String,
        check_in: String,
        check_out: String,
    },

    #[error("Batch input invalid: {message}")]
    InvalidBatch { message: String },
}

impl EngineError {
    /// Get the error code
    pub fn code(&self) -> EngineErrorCode {
        match self {
            EngineError::IncompleteBooking { .. } => EngineErrorCode::IncompleteBooking,
            EngineError::InvalidAdvance { .. } => EngineErrorCode::InvalidAdvance,
            EngineError::InvalidPeriod { .. } => EngineErrorCode::InvalidPeriod,
            EngineError::InvalidBatch { .. } => EngineErrorCode::InvalidBatch,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> EngineErrorSeverity {
        match self {
            EngineError::IncompleteBooking { .. } => EngineErrorSeverity::Error,
            EngineError::InvalidAdvance { .. } => EngineErrorSeverity::Error,
            EngineError::InvalidPeriod { .. } => EngineErrorSeverity::Error,
            EngineError::InvalidBatch { .. } => EngineErrorSeverity::Critical,
        }
    }
}

/// Result type with EngineError
pub type EngineResult<T> = Result<T, EngineError>;

// ==================== Tests ====================
