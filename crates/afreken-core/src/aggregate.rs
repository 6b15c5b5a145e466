//! Booking aggregation
//!
//! Folds decoded sheet records into per-booking aggregates. Grouping
//! is by address in first-encounter order, so a batch always settles
//! in the order the sheet lists its properties.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use afreken_rows::{BasisRecord, CleaningRecord, MeterRecord, RowRecord};

use crate::booking::{
    line_item_from_record, Booking, BookingKey, CleaningBudget, DepositBudget, LineItem,
    MeterReadings, UtilitiesBudget,
};
use crate::error::{EngineError, EngineResult};

/// A recovery applied while folding one booking. The booking still
/// settles; the caller sees what was patched over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWarning {
    pub address: String,
    pub message: String,
}

/// Accumulates the records of one address before the booking is built.
#[derive(Debug, Default)]
struct BookingDraft {
    basis: Option<BasisRecord>,
    meters: Option<MeterRecord>,
    utility_items: Vec<LineItem>,
    damage_items: Vec<LineItem>,
    cleaning_label: Option<String>,
    cleaning_included_hours: Option<Decimal>,
    cleaning_hourly_rate: Option<Decimal>,
    cleaning_actual_hours: Decimal,
}

impl BookingDraft {
    fn push(&mut self, address: &str, record: RowRecord, warnings: &mut Vec<BookingWarning>) {
        match record {
            RowRecord::Basis(basis) => {
                if self.basis.is_some() {
                    let message =
                        format!("Duplicate header row for '{}': keeping the later one", address);
                    log::warn!("{}", message);
                    warnings.push(BookingWarning {
                        address: address.to_string(),
                        message,
                    });
                }
                self.basis = Some(basis);
            }
            RowRecord::Meter(meters) => {
                self.meters = Some(meters);
            }
            RowRecord::UtilityItem(item) => {
                self.utility_items.push(line_item_from_record(&item));
            }
            RowRecord::Damage(item) => {
                self.damage_items.push(line_item_from_record(&item));
            }
            RowRecord::Cleaning(cleaning) => self.merge_cleaning(cleaning),
        }
    }

    // Cleaning data arrives spread over rows: scalar fields keep the
    // last non-blank value, worked hours add up.
    fn merge_cleaning(&mut self, cleaning: CleaningRecord) {
        if cleaning.label.is_some() {
            self.cleaning_label = cleaning.label;
        }
        if cleaning.included_hours.is_some() {
            self.cleaning_included_hours = cleaning.included_hours;
        }
        if cleaning.hourly_rate.is_some() {
            self.cleaning_hourly_rate = cleaning.hourly_rate;
        }
        if let Some(hours) = cleaning.actual_hours {
            self.cleaning_actual_hours += hours;
        }
    }

    fn build(self, address: String) -> EngineResult<Booking> {
        let basis = self
            .basis
            .ok_or_else(|| EngineError::IncompleteBooking {
                address: address.clone(),
            })?;

        let booking = Booking {
            key: BookingKey {
                address,
                check_in: basis.check_in,
                check_out: basis.check_out,
            },
            client: basis.client,
            deposit: DepositBudget {
                advance: basis.deposit_advance,
                used: basis.deposit_used,
            },
            utilities: UtilitiesBudget {
                advance: basis.utilities_advance,
                line_items: self.utility_items,
            },
            cleaning: CleaningBudget {
                advance: basis.cleaning_advance,
                label: self.cleaning_label,
                included_hours: self.cleaning_included_hours.unwrap_or(Decimal::ZERO),
                hourly_rate: self.cleaning_hourly_rate.unwrap_or(Decimal::ZERO),
                actual_hours: self.cleaning_actual_hours,
            },
            damages: self.damage_items,
            meters: self.meters.as_ref().map(MeterReadings::from),
        };

        booking.validate()?;
        Ok(booking)
    }
}

/// Fold decoded records into bookings, one result per distinct
/// address, plus the recoveries applied along the way.
///
/// A failed booking yields its error in place; the rest of the batch
/// is unaffected.
pub fn aggregate(
    records: Vec<(String, RowRecord)>,
) -> (Vec<EngineResult<Booking>>, Vec<BookingWarning>) {
    let mut order: Vec<String> = Vec::new();
    let mut drafts: HashMap<String, BookingDraft> = HashMap::new();
    let mut warnings = Vec::new();

    for (address, record) in records {
        if !drafts.contains_key(&address) {
            order.push(address.clone());
        }
        drafts
            .entry(address.clone())
            .or_default()
            .push(&address, record, &mut warnings);
    }

    let bookings = order
        .into_iter()
        .map(|address| {
            let draft = drafts.remove(&address).unwrap_or_default();
            draft.build(address)
        })
        .collect();

    (bookings, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use afreken_rows::{LineItemRecord, MeterPair};
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn basis(deposit: &str) -> RowRecord {
        RowRecord::Basis(BasisRecord {
            client: None,
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            deposit_advance: dec(deposit),
            deposit_used: Decimal::ZERO,
            utilities_advance: dec("250"),
            cleaning_advance: dec("120"),
        })
    }

    fn utility(excl: &str) -> RowRecord {
        RowRecord::UtilityItem(LineItemRecord {
            description: "Elektra".to_string(),
            quantity: Decimal::ONE,
            unit_price: dec(excl),
            vat_rate: dec("0.21"),
        })
    }

    #[test]
    fn test_groups_by_address_in_first_encounter_order() {
        let records = vec![
            ("B-straat 2".to_string(), basis("300")),
            ("A-gracht 1".to_string(), basis("500")),
            ("B-straat 2".to_string(), utility("100")),
        ];

        let (results, _) = aggregate(records);
        assert_eq!(results.len(), 2);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.key.address, "B-straat 2");
        assert_eq!(first.utilities.line_items.len(), 1);

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.key.address, "A-gracht 1");
        assert_eq!(second.deposit.advance, dec("500"));
    }

    #[test]
    fn test_duplicate_basis_last_wins() {
        let records = vec![
            ("A-gracht 1".to_string(), basis("500")),
            ("A-gracht 1".to_string(), basis("750")),
        ];

        let (results, warnings) = aggregate(records);
        let booking = results[0].as_ref().unwrap();
        assert_eq!(booking.deposit.advance, dec("750"));

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].address, "A-gracht 1");
        assert!(warnings[0].message.contains("Duplicate header"));
    }

    #[test]
    fn test_missing_basis_excludes_booking_only() {
        let records = vec![
            ("A-gracht 1".to_string(), utility("100")),
            ("B-straat 2".to_string(), basis("300")),
        ];

        let (results, _) = aggregate(records);
        assert_eq!(results.len(), 2);

        let err = results[0].as_ref().unwrap_err();
        assert_eq!(err.code(), crate::error::EngineErrorCode::IncompleteBooking);
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_cleaning_hours_summed_scalars_last_non_blank() {
        let records = vec![
            ("A-gracht 1".to_string(), basis("500")),
            (
                "A-gracht 1".to_string(),
                RowRecord::Cleaning(CleaningRecord {
                    label: Some("Basis".to_string()),
                    included_hours: Some(dec("5")),
                    hourly_rate: Some(dec("40")),
                    actual_hours: Some(dec("3")),
                }),
            ),
            (
                "A-gracht 1".to_string(),
                RowRecord::Cleaning(CleaningRecord {
                    label: None,
                    included_hours: None,
                    hourly_rate: None,
                    actual_hours: Some(dec("4.5")),
                }),
            ),
        ];

        let (results, _) = aggregate(records);
        let booking = results[0].as_ref().unwrap();
        assert_eq!(booking.cleaning.label.as_deref(), Some("Basis"));
        assert_eq!(booking.cleaning.included_hours, dec("5"));
        assert_eq!(booking.cleaning.actual_hours, dec("7.5"));
    }

    #[test]
    fn test_meters_carried_through() {
        let records = vec![
            ("A-gracht 1".to_string(), basis("500")),
            (
                "A-gracht 1".to_string(),
                RowRecord::Meter(MeterRecord {
                    electricity: MeterPair {
                        begin: dec("1000"),
                        end: dec("1250"),
                    },
                    gas: MeterPair {
                        begin: dec("400"),
                        end: dec("430"),
                    },
                    water: MeterPair {
                        begin: dec("0"),
                        end: dec("0"),
                    },
                }),
            ),
        ];

        let (results, _) = aggregate(records);
        let booking = results[0].as_ref().unwrap();
        let meters = booking.meters.unwrap();
        assert_eq!(meters.electricity_end, dec("1250"));
    }
}
