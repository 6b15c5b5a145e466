//! Legacy named-field ingestion
//!
//! Older workbooks expose one booking per file through named ranges
//! ("Object_adres", "Voorschot_borg", ...) instead of the flat batch
//! sheet. This module lowers such a named-field map onto the same
//! typed records the batch decoder produces, so everything downstream
//! of decoding is shared between the two input shapes.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::cell::CellValue;
use crate::error::{RowError, RowResult};
use crate::record::{
    BasisRecord, CleaningRecord, MeterPair, MeterRecord, RowRecord,
};

/// A legacy workbook's named ranges, already materialized as cells.
pub type NamedFields = HashMap<String, CellValue>;

/// Decode a legacy named-field map into the address key and the
/// equivalent batch records (header, meters, cleaning).
///
/// Names the legacy shape never defined are left alone; a required
/// name that is absent from the map is an `UnknownNamedField` failure,
/// while a present-but-unusable value fails the same way a batch cell
/// would.
pub fn decode_named(fields: &NamedFields) -> RowResult<(String, Vec<RowRecord>)> {
    let required = |name: &str| -> RowResult<&CellValue> {
        fields.get(name).ok_or_else(|| RowError::UnknownNamedField {
            name: name.to_string(),
        })
    };
    let optional = |name: &str| -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        fields.get(name).unwrap_or(&EMPTY)
    };

    let address = required("Object_adres")?
        .as_text()
        .ok_or_else(|| RowError::MissingField {
            field: "Object_adres".to_string(),
        })?
        .to_string();

    let basis = BasisRecord {
        client: optional("Klantnaam").as_text().map(str::to_string),
        check_in: required("Incheck_datum")?.as_date("Incheck_datum")?,
        check_out: required("Uitcheck_datum")?.as_date("Uitcheck_datum")?,
        deposit_advance: optional("Voorschot_borg").as_decimal_or_zero("Voorschot_borg")?,
        deposit_used: optional("Borg_gebruikt").as_decimal_or_zero("Borg_gebruikt")?,
        utilities_advance: optional("Voorschot_GWE").as_decimal_or_zero("Voorschot_GWE")?,
        cleaning_advance: optional("Schoonmaak_voorschot")
            .as_decimal_or_zero("Schoonmaak_voorschot")?,
    };

    let pair = |begin: &str, end: &str| -> RowResult<MeterPair> {
        Ok(MeterPair {
            begin: optional(begin).as_decimal_or_zero(begin)?,
            end: optional(end).as_decimal_or_zero(end)?,
        })
    };
    let meters = MeterRecord {
        electricity: pair("KWh_begin", "KWh_eind")?,
        gas: pair("Gas_begin", "Gas_eind")?,
        water: pair("Water_begin", "Water_eind")?,
    };

    let opt_decimal = |name: &str| -> RowResult<Option<Decimal>> {
        let cell = optional(name);
        if cell.is_blank() {
            Ok(None)
        } else {
            cell.as_decimal(name).map(Some)
        }
    };
    let cleaning = CleaningRecord {
        label: optional("Schoonmaak_pakket").as_text().map(str::to_string),
        included_hours: opt_decimal("Schoonmaak_uren_inbegrepen")?,
        hourly_rate: opt_decimal("Uurtarief_schoonmaak")?,
        actual_hours: opt_decimal("Totaal_uren_gew")?,
    };

    Ok((
        address,
        vec![
            RowRecord::Basis(basis),
            RowRecord::Meter(meters),
            RowRecord::Cleaning(cleaning),
        ],
    ))
}
