//! Booking domain model
//!
//! A booking is one stay at one property, assembled from the typed
//! sheet records: a header with three prepaid advances, and whatever
//! meter readings, priced lines and cleaning data the sheet carried
//! for it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use afreken_rows::MeterRecord;

use crate::error::{EngineError, EngineResult};

// ==================== Identity ====================

/// Identity of one booking: the property plus the stay period.
///
/// Two settlements are revisions of each other exactly when their keys
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingKey {
    pub address: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl std::fmt::Display for BookingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} – {}]", self.address, self.check_in, self.check_out)
    }
}

// ==================== Budgets ====================

/// One priced line with its own VAT rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// VAT rate as a fraction (0.21)
    pub vat_rate: Decimal,
}

impl LineItem {
    /// Line amount excluding VAT
    pub fn excl(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// VAT amount for this line at its own rate
    pub fn vat(&self) -> Decimal {
        self.excl() * self.vat_rate
    }

    /// Line amount including VAT
    pub fn incl(&self) -> Decimal {
        self.excl() + self.vat()
    }
}

/// Deposit budget: the advance and the portion reported as used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositBudget {
    pub advance: Decimal,
    pub used: Decimal,
}

/// Utilities budget: the advance and the priced lines charged
/// against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilitiesBudget {
    pub advance: Decimal,
    pub line_items: Vec<LineItem>,
}

/// Cleaning budget: hours-based. The advance buys a number of included
/// hours at a fixed rate; only hours beyond that are charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningBudget {
    pub advance: Decimal,
    pub label: Option<String>,
    pub included_hours: Decimal,
    pub hourly_rate: Decimal,
    pub actual_hours: Decimal,
}

impl CleaningBudget {
    /// Hours charged beyond the included package, never negative.
    pub fn extra_hours(&self) -> Decimal {
        let extra = self.actual_hours - self.included_hours;
        if extra < Decimal::ZERO {
            Decimal::ZERO
        } else {
            extra
        }
    }

    /// Amount actually charged against the cleaning advance.
    pub fn actual_cost(&self) -> Decimal {
        self.extra_hours() * self.hourly_rate
    }
}

// ==================== Booking ====================

/// One fully aggregated booking, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub key: BookingKey,
    pub client: Option<String>,
    pub deposit: DepositBudget,
    pub utilities: UtilitiesBudget,
    pub cleaning: CleaningBudget,
    /// Damage lines are reported on the settlement but never charged
    /// against any of the three budgets.
    pub damages: Vec<LineItem>,
    /// Raw meter readings, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meters: Option<MeterReadings>,
}

/// Begin/end readings for the three utility meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReadings {
    pub electricity_begin: Decimal,
    pub electricity_end: Decimal,
    pub gas_begin: Decimal,
    pub gas_end: Decimal,
    pub water_begin: Decimal,
    pub water_end: Decimal,
}

impl From<&MeterRecord> for MeterReadings {
    fn from(record: &MeterRecord) -> Self {
        MeterReadings {
            electricity_begin: record.electricity.begin,
            electricity_end: record.electricity.end,
            gas_begin: record.gas.begin,
            gas_end: record.gas.end,
            water_begin: record.water.begin,
            water_end: record.water.end,
        }
    }
}

impl Booking {
    /// Validate the invariants the reconciliation step relies on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.key.check_out <= self.key.check_in {
            return Err(EngineError::InvalidPeriod {
                address: self.key.address.clone(),
                check_in: self.key.check_in.to_string(),
                check_out: self.key.check_out.to_string(),
            });
        }

        let advances = [
            ("deposit_advance", self.deposit.advance),
            ("utilities_advance", self.utilities.advance),
            ("cleaning_advance", self.cleaning.advance),
        ];
        for (field, amount) in advances {
            if amount < Decimal::ZERO {
                return Err(EngineError::InvalidAdvance {
                    address: self.key.address.clone(),
                    field: field.to_string(),
                    value: amount.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Informational damages total, VAT included.
    pub fn damages_total(&self) -> Decimal {
        crate::totals::Totals::of(&self.damages).incl
    }
}

/// Convenience constructor used by the aggregator and tests.
pub(crate) fn line_item_from_record(record: &afreken_rows::LineItemRecord) -> LineItem {
    LineItem {
        description: record.description.clone(),
        quantity: record.quantity,
        unit_price: record.unit_price,
        vat_rate: record.vat_rate,
    }
}

/// A minimal valid booking, shared by tests across the crate.
#[cfg(test)]
pub(crate) fn sample_booking() -> Booking {
    Booking {
        key: BookingKey {
            address: "Herengracht 12".to_string(),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        },
        client: Some("Jansen BV".to_string()),
        deposit: DepositBudget {
            advance: "500".parse().unwrap(),
            used: Decimal::ZERO,
        },
        utilities: UtilitiesBudget {
            advance: "250".parse().unwrap(),
            line_items: vec![],
        },
        cleaning: CleaningBudget {
            advance: "120".parse().unwrap(),
            label: None,
            included_hours: "5".parse().unwrap(),
            hourly_rate: "40".parse().unwrap(),
            actual_hours: "5".parse().unwrap(),
        },
        damages: vec![],
        meters: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_item_per_line_vat() {
        let item = LineItem {
            description: "Elektra".to_string(),
            quantity: dec("2"),
            unit_price: dec("50"),
            vat_rate: dec("0.21"),
        };
        assert_eq!(item.excl(), dec("100"));
        assert_eq!(item.vat(), dec("21"));
        assert_eq!(item.incl(), dec("121"));
    }

    #[test]
    fn test_cleaning_extra_hours_never_negative() {
        let cleaning = CleaningBudget {
            advance: dec("120"),
            label: None,
            included_hours: dec("5"),
            hourly_rate: dec("40"),
            actual_hours: dec("3"),
        };
        assert_eq!(cleaning.extra_hours(), Decimal::ZERO);
        assert_eq!(cleaning.actual_cost(), Decimal::ZERO);

        let cleaning = CleaningBudget {
            actual_hours: dec("7.5"),
            ..cleaning
        };
        assert_eq!(cleaning.extra_hours(), dec("2.5"));
        assert_eq!(cleaning.actual_cost(), dec("100"));
    }

    #[test]
    fn test_validate_rejects_inverted_period() {
        let booking = sample_booking();
        assert!(booking.validate().is_ok());

        let mut inverted = sample_booking();
        inverted.key.check_out = inverted.key.check_in;
        let err = inverted.validate().unwrap_err();
        assert_eq!(err.code(), crate::error::EngineErrorCode::InvalidPeriod);
    }

    #[test]
    fn test_validate_rejects_negative_advance() {
        let mut booking = sample_booking();
        booking.utilities.advance = dec("-250");
        let err = booking.validate().unwrap_err();
        assert_eq!(err.code(), crate::error::EngineErrorCode::InvalidAdvance);
    }
}
