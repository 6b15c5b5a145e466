//! Totals over priced lines
//!
//! VAT is summed per line at each line's own rate. With mixed 9%/21%
//! lines a blended rate over the aggregate gives a different (wrong)
//! answer, so no code path ever applies a rate to a sum.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::booking::LineItem;

/// Excl/VAT/incl totals over a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub excl: Decimal,
    pub vat: Decimal,
    pub incl: Decimal,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        excl: Decimal::ZERO,
        vat: Decimal::ZERO,
        incl: Decimal::ZERO,
    };

    /// Sum a set of lines, accumulating VAT per line.
    pub fn of(items: &[LineItem]) -> Totals {
        let mut totals = Totals::ZERO;
        for item in items {
            totals.excl += item.excl();
            totals.vat += item.vat();
            totals.incl += item.incl();
        }
        totals
    }
}

impl Default for Totals {
    fn default() -> Self {
        Totals::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(excl: &str, vat_rate: &str) -> LineItem {
        LineItem {
            description: "regel".to_string(),
            quantity: Decimal::ONE,
            unit_price: dec(excl),
            vat_rate: dec(vat_rate),
        }
    }

    #[test]
    fn test_empty_totals_are_zero() {
        assert_eq!(Totals::of(&[]), Totals::ZERO);
    }

    #[test]
    fn test_two_standard_rate_lines() {
        let totals = Totals::of(&[item("10.00", "0.21"), item("20.00", "0.21")]);
        assert_eq!(totals.excl, dec("30.00"));
        assert_eq!(totals.vat, dec("6.30"));
        assert_eq!(totals.incl, dec("36.30"));
        assert_eq!(totals.incl, totals.excl + totals.vat);
    }

    #[test]
    fn test_mixed_rates_summed_per_line() {
        // 100 @ 21% + 100 @ 9%: per-line VAT is 30.00. Any blended
        // rate over the 200 aggregate would disagree.
        let totals = Totals::of(&[item("100", "0.21"), item("100", "0.09")]);
        assert_eq!(totals.excl, dec("200"));
        assert_eq!(totals.vat, dec("30"));
        assert_eq!(totals.incl, dec("230"));
    }

    #[test]
    fn test_quantity_times_price() {
        let line = LineItem {
            description: "Gas".to_string(),
            quantity: dec("3"),
            unit_price: dec("12.50"),
            vat_rate: dec("0.09"),
        };
        let totals = Totals::of(&[line]);
        assert_eq!(totals.excl, dec("37.50"));
        assert_eq!(totals.vat, dec("3.375"));
        assert_eq!(totals.incl, dec("40.875"));
    }
}
