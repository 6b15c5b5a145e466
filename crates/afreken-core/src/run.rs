//! Batch run driver
//!
//! Drives one settlement run end to end: decode rows, aggregate
//! bookings, reconcile, compose. Failures are collected into the run
//! report at the layer they occur; only a batch that is unusable as a
//! whole aborts the run.

use serde::{Deserialize, Serialize};

use afreken_rows::{decode_named, CellValue, NamedFields, RowDecoder};

use crate::aggregate::{aggregate, BookingWarning};
use crate::error::{EngineError, EngineResult};
use crate::settle::{compose, Settlement};

// ==================== Run report ====================

/// A row that could not be decoded and was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Zero-based index into the input batch
    pub index: usize,
    pub code: String,
    pub message: String,
}

/// A booking that was excluded from the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedBooking {
    pub address: String,
    pub code: String,
    pub message: String,
}

/// Everything one run produced: the settlements plus a full account of
/// what was skipped or excluded along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunOutcome {
    pub settlements: Vec<Settlement>,
    pub excluded: Vec<ExcludedBooking>,
    pub skipped_rows: Vec<SkippedRow>,
    /// Recoveries applied during aggregation (the bookings settled)
    pub warnings: Vec<BookingWarning>,
}

impl RunOutcome {
    /// True when nothing was skipped, excluded or patched over.
    pub fn is_clean(&self) -> bool {
        self.excluded.is_empty() && self.skipped_rows.is_empty() && self.warnings.is_empty()
    }
}

// ==================== Driver ====================

/// Run a full batch of raw sheet rows.
///
/// Undecodable rows are skipped with a warning, failed bookings are
/// excluded with their error; both end up in the outcome instead of
/// aborting the batch. An empty batch yields an empty outcome; what
/// to do about settling nothing is the caller's call.
pub fn run_batch(
    rows: &[Vec<CellValue>],
    decoder: &RowDecoder,
    reason: &str,
) -> EngineResult<RunOutcome> {
    let mut outcome = RunOutcome::default();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match decoder.decode_row(row) {
            Ok(decoded) => records.push(decoded),
            Err(error) => {
                log::warn!("Skipping row {}: {}", index, error);
                outcome.skipped_rows.push(SkippedRow {
                    index,
                    code: error.code().to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    let (bookings, warnings) = aggregate(records);
    outcome.warnings = warnings;
    for result in bookings {
        match result {
            Ok(booking) => outcome.settlements.push(compose(&booking, reason)),
            Err(error) => {
                log::warn!("Excluding booking: {}", error);
                outcome.excluded.push(ExcludedBooking {
                    address: booking_address(&error),
                    code: error.code().to_string(),
                    message: error.to_string(),
                });
            }
        }
    }

    log::info!(
        "Run complete: {} settlements, {} excluded, {} rows skipped",
        outcome.settlements.len(),
        outcome.excluded.len(),
        outcome.skipped_rows.len()
    );

    Ok(outcome)
}

/// Settle a single legacy named-field booking.
pub fn run_named(fields: &NamedFields, reason: &str) -> EngineResult<RunOutcome> {
    let (address, records) = decode_named(fields).map_err(|error| EngineError::InvalidBatch {
        message: error.to_string(),
    })?;

    let tagged = records.into_iter().map(|r| (address.clone(), r)).collect();

    let mut outcome = RunOutcome::default();
    let (bookings, warnings) = aggregate(tagged);
    outcome.warnings = warnings;
    for result in bookings {
        match result {
            Ok(booking) => outcome.settlements.push(compose(&booking, reason)),
            Err(error) => outcome.excluded.push(ExcludedBooking {
                address: booking_address(&error),
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    Ok(outcome)
}

fn booking_address(error: &EngineError) -> String {
    match error {
        EngineError::IncompleteBooking { address }
        | EngineError::InvalidAdvance { address, .. }
        | EngineError::InvalidPeriod { address, .. } => address.clone(),
        EngineError::InvalidBatch { .. } => String::new(),
    }
}
