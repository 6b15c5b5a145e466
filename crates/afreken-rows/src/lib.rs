//! # afreken-rows
//!
//! Row classification and typed record decoding for settlement input
//! sheets.
//!
//! The input is a flat sheet in which each row encodes one of five
//! record kinds, located by per-kind column offsets and dispatched on a
//! discriminator column. This crate turns those rows into a typed
//! `RowRecord` sum type before any business logic runs:
//!
//! - [`cell`] — loosely-typed cell values and total coercions
//! - [`schema`] — row kinds and the per-kind column layouts
//! - [`record`] — typed records and the [`RowDecoder`]
//! - [`legacy`] — named-field ingestion for single-booking workbooks
//! - [`error`] — typed decode failures, all non-fatal per row

pub mod cell;
pub mod error;
pub mod legacy;
pub mod record;
pub mod schema;

pub use cell::CellValue;
pub use error::{RowError, RowResult};
pub use legacy::{decode_named, NamedFields};
pub use record::{
    normalize_vat_rate, BasisRecord, CleaningRecord, LineItemRecord, MeterPair, MeterRecord,
    RowDecoder, RowRecord,
};
pub use schema::{RowKind, ROW_WIDTH};
