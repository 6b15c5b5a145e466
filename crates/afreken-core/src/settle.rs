//! Settlement composition
//!
//! Turns a reconciled booking into the persistable settlement record.
//! All money on a settlement is rounded to cents; the net amount is
//! the sum of exactly the three budget deltas, with damages reported
//! alongside but never folded in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use afreken_utils::round_money;

use crate::booking::{Booking, BookingKey, LineItem, MeterReadings};
use crate::reconcile::{reconcile, Reconciliation};

/// A composed settlement for one booking.
///
/// `version` is 0 until the revision ledger assigns a real one on
/// append; a settlement is never its own source of version numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub key: BookingKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub reconciliation: Reconciliation,
    /// Informational damages, VAT included per line
    pub damages: Vec<LineItem>,
    pub damages_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meters: Option<MeterReadings>,
    /// Signed result: positive means the operator owes the tenant
    pub net_amount: Decimal,
    /// Revision number within this booking's history, 0 = unassigned
    pub version: u32,
    /// Why this settlement (or revision) was produced
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Compose a settlement from a validated booking.
pub fn compose(booking: &Booking, reason: &str) -> Settlement {
    let reconciliation = reconcile(booking);
    let net_amount = round_money(reconciliation.net_amount());

    Settlement {
        key: booking.key.clone(),
        client: booking.client.clone(),
        damages: booking.damages.clone(),
        damages_total: round_money(booking.damages_total()),
        meters: booking.meters,
        net_amount,
        reconciliation,
        version: 0,
        reason: reason.to_string(),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::sample_booking;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_net_amount_is_sum_of_three_deltas() {
        let mut booking = sample_booking();
        booking.deposit.used = dec("75");
        booking.utilities.line_items = vec![LineItem {
            description: "Elektra".to_string(),
            quantity: Decimal::ONE,
            unit_price: dec("150"),
            vat_rate: dec("0.21"),
        }];

        let settlement = compose(&booking, "initial");
        // 425 deposit + 68.50 utilities + 120 cleaning
        assert_eq!(settlement.net_amount, dec("613.50"));
        assert_eq!(
            settlement.net_amount,
            settlement.reconciliation.deposit.delta
                + settlement.reconciliation.utilities.delta
                + settlement.reconciliation.cleaning.delta
        );
    }

    #[test]
    fn test_tenant_owes_when_overruns_beat_refunds() {
        // Deposit fully used, utilities 285.64 over budget, cleaning
        // 125 under: the tenant owes 160.64.
        let mut booking = sample_booking();
        booking.deposit.used = dec("500");
        booking.utilities.advance = dec("300");
        booking.utilities.line_items = vec![LineItem {
            description: "GWE werkelijk".to_string(),
            quantity: Decimal::ONE,
            unit_price: dec("484.00"),
            vat_rate: dec("0.21"),
        }];
        booking.cleaning.advance = dec("250");
        booking.cleaning.included_hours = dec("5");
        booking.cleaning.hourly_rate = dec("50");
        booking.cleaning.actual_hours = dec("7.5");

        let settlement = compose(&booking, "initial");
        assert_eq!(settlement.reconciliation.utilities.delta, dec("-285.64"));
        assert_eq!(settlement.net_amount, dec("-160.64"));
    }

    #[test]
    fn test_damages_reported_but_not_charged() {
        let mut booking = sample_booking();
        booking.damages = vec![LineItem {
            description: "Gebroken ruit".to_string(),
            quantity: Decimal::ONE,
            unit_price: dec("80"),
            vat_rate: dec("0.21"),
        }];

        let without = compose(&sample_booking(), "initial");
        let with = compose(&booking, "initial");

        assert_eq!(with.damages_total, dec("96.80"));
        assert_eq!(with.net_amount, without.net_amount);
    }

    #[test]
    fn test_fresh_settlement_has_no_version() {
        let settlement = compose(&sample_booking(), "initial");
        assert_eq!(settlement.version, 0);
        assert_eq!(settlement.reason, "initial");
    }
}
