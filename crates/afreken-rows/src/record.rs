//! Typed records decoded from flat sheet rows
//!
//! One decode step turns a raw cell row into a `RowRecord` variant, so
//! everything downstream works with typed fields instead of column
//! indices.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::{RowError, RowResult};
use crate::schema::{self, RowKind};

// ==================== Records ====================

/// Booking header row: the period and the three prepaid advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisRecord {
    pub client: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Deposit paid up front
    pub deposit_advance: Decimal,
    /// Portion of the deposit reported as used
    pub deposit_used: Decimal,
    /// Utilities budget paid up front
    pub utilities_advance: Decimal,
    /// Cleaning budget paid up front
    pub cleaning_advance: Decimal,
}

/// One begin/end meter reading pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterPair {
    pub begin: Decimal,
    pub end: Decimal,
}

impl MeterPair {
    /// Consumption over the stay. A reset or typo can make end < begin;
    /// consumption is clamped to zero rather than reported negative.
    pub fn consumption(&self) -> Decimal {
        let delta = self.end - self.begin;
        if delta < Decimal::ZERO {
            Decimal::ZERO
        } else {
            delta
        }
    }
}

/// Raw utility meter readings. Informational only: pricing always comes
/// from utility line items, never from these readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterRecord {
    pub electricity: MeterPair,
    pub gas: MeterPair,
    pub water: MeterPair,
}

/// Cleaning package row. Fields are optional because the sheet spreads
/// them over multiple rows; the aggregator keeps the last non-blank
/// value per field and sums the hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRecord {
    pub label: Option<String>,
    pub included_hours: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
}

/// One priced line: a utility charge or a damage charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// VAT rate as a fraction (0.21, never 21)
    pub vat_rate: Decimal,
}

/// One decoded sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowRecord {
    Basis(BasisRecord),
    Meter(MeterRecord),
    UtilityItem(LineItemRecord),
    Cleaning(CleaningRecord),
    Damage(LineItemRecord),
}

impl RowRecord {
    pub fn kind(&self) -> RowKind {
        match self {
            RowRecord::Basis(_) => RowKind::Basis,
            RowRecord::Meter(_) => RowKind::Meter,
            RowRecord::UtilityItem(_) => RowKind::UtilityItem,
            RowRecord::Cleaning(_) => RowKind::Cleaning,
            RowRecord::Damage(_) => RowKind::Damage,
        }
    }
}

// ==================== Decoder ====================

/// Decodes flat cell rows into typed records.
#[derive(Debug, Clone)]
pub struct RowDecoder {
    /// Applied when a priced line carries no VAT rate
    default_vat_rate: Decimal,
}

impl RowDecoder {
    pub fn new(default_vat_rate: Decimal) -> Self {
        RowDecoder { default_vat_rate }
    }

    /// Decode one sheet row into its address key and typed record.
    ///
    /// Short rows are padded with blanks up to the schema width before
    /// extraction, so a trailing-blank row and a truncated row decode
    /// identically.
    pub fn decode_row(&self, cells: &[CellValue]) -> RowResult<(String, RowRecord)> {
        if cells.len() <= schema::shared::KIND {
            return Err(RowError::RowTooShort {
                expected: schema::shared::KIND + 1,
                actual: cells.len(),
            });
        }

        let mut row = cells.to_vec();
        if row.len() < schema::ROW_WIDTH {
            row.resize(schema::ROW_WIDTH, CellValue::Empty);
        }

        let address = row[schema::shared::ADDRESS]
            .as_text()
            .ok_or_else(|| RowError::MissingField {
                field: "address".to_string(),
            })?
            .to_string();

        let discriminator =
            row[schema::shared::KIND]
                .as_text()
                .ok_or_else(|| RowError::MissingField {
                    field: "kind".to_string(),
                })?;

        let kind: RowKind =
            discriminator
                .parse()
                .map_err(|_| RowError::UnrecognizedRowKind {
                    discriminator: discriminator.to_string(),
                })?;

        let record = match kind {
            RowKind::Basis => RowRecord::Basis(self.decode_basis(&row)?),
            RowKind::Meter => RowRecord::Meter(self.decode_meter(&row)?),
            RowKind::UtilityItem => RowRecord::UtilityItem(self.decode_item(&row)?),
            RowKind::Cleaning => RowRecord::Cleaning(self.decode_cleaning(&row)?),
            RowKind::Damage => RowRecord::Damage(self.decode_item(&row)?),
        };

        Ok((address, record))
    }

    fn decode_basis(&self, row: &[CellValue]) -> RowResult<BasisRecord> {
        use schema::basis::*;

        Ok(BasisRecord {
            client: row[CLIENT].as_text().map(str::to_string),
            check_in: row[CHECK_IN].as_date("check_in")?,
            check_out: row[CHECK_OUT].as_date("check_out")?,
            deposit_advance: row[DEPOSIT_ADVANCE].as_decimal_or_zero("deposit_advance")?,
            deposit_used: row[DEPOSIT_USED].as_decimal_or_zero("deposit_used")?,
            utilities_advance: row[UTILITIES_ADVANCE].as_decimal_or_zero("utilities_advance")?,
            cleaning_advance: row[CLEANING_ADVANCE].as_decimal_or_zero("cleaning_advance")?,
        })
    }

    fn decode_meter(&self, row: &[CellValue]) -> RowResult<MeterRecord> {
        use schema::meter::*;

        let pair = |begin: usize, end: usize, name: &str| -> RowResult<MeterPair> {
            Ok(MeterPair {
                begin: row[begin].as_decimal_or_zero(&format!("{name}_begin"))?,
                end: row[end].as_decimal_or_zero(&format!("{name}_end"))?,
            })
        };

        Ok(MeterRecord {
            electricity: pair(ELECTRICITY_BEGIN, ELECTRICITY_END, "electricity")?,
            gas: pair(GAS_BEGIN, GAS_END, "gas")?,
            water: pair(WATER_BEGIN, WATER_END, "water")?,
        })
    }

    fn decode_cleaning(&self, row: &[CellValue]) -> RowResult<CleaningRecord> {
        use schema::cleaning::*;

        let opt_decimal = |idx: usize, name: &str| -> RowResult<Option<Decimal>> {
            if row[idx].is_blank() {
                Ok(None)
            } else {
                row[idx].as_decimal(name).map(Some)
            }
        };

        Ok(CleaningRecord {
            label: row[LABEL].as_text().map(str::to_string),
            included_hours: opt_decimal(INCLUDED_HOURS, "included_hours")?,
            hourly_rate: opt_decimal(HOURLY_RATE, "hourly_rate")?,
            actual_hours: opt_decimal(ACTUAL_HOURS, "actual_hours")?,
        })
    }

    fn decode_item(&self, row: &[CellValue]) -> RowResult<LineItemRecord> {
        use schema::item::*;

        let description = row[DESCRIPTION]
            .as_text()
            .ok_or_else(|| RowError::MissingField {
                field: "description".to_string(),
            })?
            .to_string();

        let quantity = if row[QUANTITY].is_blank() {
            Decimal::ONE
        } else {
            row[QUANTITY].as_decimal("quantity")?
        };

        let unit_price = row[UNIT_PRICE].as_decimal("unit_price")?;

        let vat_rate = if row[VAT_RATE].is_blank() {
            self.default_vat_rate
        } else {
            normalize_vat_rate(row[VAT_RATE].as_decimal("vat_rate")?)?
        };

        Ok(LineItemRecord {
            description,
            quantity,
            unit_price,
            vat_rate,
        })
    }
}

/// Sheets carry VAT as either a fraction (0.21) or a percentage (21);
/// anything above 1 is read as a percentage and divided by 100. A
/// rate that is negative, or still above 1 after the percentage read,
/// is a typed failure so the row is skipped rather than priced wrong.
pub fn normalize_vat_rate(rate: Decimal) -> RowResult<Decimal> {
    let normalized = if rate > Decimal::ONE {
        rate / Decimal::ONE_HUNDRED
    } else {
        rate
    };

    if normalized < Decimal::ZERO || normalized > Decimal::ONE {
        return Err(RowError::InvalidVatRate {
            value: rate.to_string(),
        });
    }

    Ok(normalized)
}
