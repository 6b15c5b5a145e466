//! # afreken-core
//!
//! Booking aggregation, totals and budget reconciliation: the engine
//! that turns decoded sheet records into settlements.
//!
//! - [`booking`] — the booking aggregate and its budgets
//! - [`aggregate`] — folding decoded records into bookings
//! - [`totals`] — per-line VAT totals over priced lines
//! - [`reconcile`] — advance-versus-actual outcomes per budget
//! - [`settle`] — composing the persistable settlement
//! - [`run`] — the batch driver and its run report
//! - [`error`] — layered failures, collected rather than thrown

pub mod aggregate;
pub mod booking;
pub mod error;
pub mod reconcile;
pub mod run;
pub mod settle;
pub mod totals;

pub use aggregate::{aggregate as aggregate_records, BookingWarning};
pub use booking::{
    Booking, BookingKey, CleaningBudget, DepositBudget, LineItem, MeterReadings, UtilitiesBudget,
};
pub use error::{EngineError, EngineErrorCode, EngineErrorSeverity, EngineResult};
pub use reconcile::{reconcile, BudgetCategory, BudgetOutcome, OutcomeStatus, Reconciliation};
pub use run::{run_batch, run_named, ExcludedBooking, RunOutcome, SkippedRow};
pub use settle::{compose, Settlement};
pub use totals::Totals;
