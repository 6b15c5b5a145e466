//! Budget reconciliation
//!
//! Each booking carries three prepaid budgets. Reconciliation compares
//! every advance against what was actually consumed and produces one
//! outcome per budget: a signed delta and a status derived from it.
//! Positive delta means money flows back to the tenant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use afreken_utils::round_money;

use crate::booking::Booking;
use crate::totals::Totals;

// ==================== Outcome types ====================

/// The three reconciled budget categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Deposit,
    Utilities,
    Cleaning,
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetCategory::Deposit => write!(f, "deposit"),
            BudgetCategory::Utilities => write!(f, "utilities"),
            BudgetCategory::Cleaning => write!(f, "cleaning"),
        }
    }
}

/// Direction of one reconciled budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Advance exceeded actual usage; the surplus goes back
    Refund,
    /// Advance exactly covered usage
    Neutral,
    /// Usage exceeded the advance; the shortfall is charged
    Overflow,
}

/// One budget category, reconciled.
///
/// `delta` is rounded to cents before the status is derived, so the
/// status always agrees with the figure a reader sees: a delta that
/// rounds to 0.00 is Neutral, never a one-cent refund.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetOutcome {
    pub category: BudgetCategory,
    pub advance: Decimal,
    pub actual: Decimal,
    pub delta: Decimal,
    pub status: OutcomeStatus,
}

impl BudgetOutcome {
    fn reconcile(category: BudgetCategory, advance: Decimal, actual: Decimal) -> BudgetOutcome {
        let delta = round_money(advance - actual);
        let status = if delta > Decimal::ZERO {
            OutcomeStatus::Refund
        } else if delta == Decimal::ZERO {
            OutcomeStatus::Neutral
        } else {
            OutcomeStatus::Overflow
        };

        BudgetOutcome {
            category,
            advance: round_money(advance),
            actual: round_money(actual),
            delta,
            status,
        }
    }

    /// Share of the advance that was consumed, as a percentage capped
    /// at 100. A zero advance reads as 0% used.
    pub fn usage_percentage(&self) -> Decimal {
        if self.advance.is_zero() {
            return Decimal::ZERO;
        }
        let pct = self.actual / self.advance * Decimal::ONE_HUNDRED;
        pct.min(Decimal::ONE_HUNDRED)
    }

    /// Overshoot beyond the advance, as a percentage of the advance.
    /// Zero unless the budget overflowed; an overflow on a zero
    /// advance reads as 100%.
    pub fn overflow_percentage(&self) -> Decimal {
        if self.status != OutcomeStatus::Overflow {
            return Decimal::ZERO;
        }
        if self.advance.is_zero() {
            return Decimal::ONE_HUNDRED;
        }
        (self.actual - self.advance) / self.advance * Decimal::ONE_HUNDRED
    }
}

// ==================== Reconciliation ====================

/// The three budget outcomes of one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub deposit: BudgetOutcome,
    pub utilities: BudgetOutcome,
    /// Per-line totals behind the utilities outcome
    pub utilities_totals: Totals,
    pub cleaning: BudgetOutcome,
}

impl Reconciliation {
    /// Sum of the three deltas: the settlement's net amount. Positive
    /// means the operator owes the tenant a refund.
    pub fn net_amount(&self) -> Decimal {
        self.deposit.delta + self.utilities.delta + self.cleaning.delta
    }
}

/// Reconcile all three budgets of a validated booking.
///
/// Deposit usage is a reported figure from the sheet. Utilities usage
/// is the VAT-inclusive sum of the priced lines. Cleaning usage is the
/// cost of hours beyond the included package.
pub fn reconcile(booking: &Booking) -> Reconciliation {
    let utilities_totals = Totals::of(&booking.utilities.line_items);

    Reconciliation {
        deposit: BudgetOutcome::reconcile(
            BudgetCategory::Deposit,
            booking.deposit.advance,
            booking.deposit.used,
        ),
        utilities: BudgetOutcome::reconcile(
            BudgetCategory::Utilities,
            booking.utilities.advance,
            utilities_totals.incl,
        ),
        utilities_totals,
        cleaning: BudgetOutcome::reconcile(
            BudgetCategory::Cleaning,
            booking.cleaning.advance,
            booking.cleaning.actual_cost(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{sample_booking, LineItem};

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
    fn test_happy_path_refund() {
        // Deposit 500 untouched, utilities 250 against 181.50 incl,
        // cleaning 120 with no extra hours.
        let mut booking = sample_booking();
        booking.utilities.line_items = vec![item("150", "0.21")];

        let rec = reconcile(&booking);
        assert_eq!(rec.deposit.delta, dec("500.00"));
        assert_eq!(rec.deposit.status, OutcomeStatus::Refund);
        assert_eq!(rec.utilities.delta, dec("68.50"));
        assert_eq!(rec.utilities.status, OutcomeStatus::Refund);
        assert_eq!(rec.cleaning.delta, dec("120.00"));
        assert_eq!(rec.net_amount(), dec("688.50"));
    }

    #[test]
    fn test_overflow_on_utilities() {
        let mut booking = sample_booking();
        booking.utilities.line_items = vec![item("250", "0.21")];

        let rec = reconcile(&booking);
        assert_eq!(rec.utilities.actual, dec("302.50"));
        assert_eq!(rec.utilities.delta, dec("-52.50"));
        assert_eq!(rec.utilities.status, OutcomeStatus::Overflow);
        assert_eq!(rec.utilities.overflow_percentage(), dec("21"));
    }

    #[test]
    fn test_fully_used_deposit_is_neutral() {
        let outcome = BudgetOutcome::reconcile(BudgetCategory::Deposit, dec("500"), dec("500"));
        assert_eq!(outcome.delta, Decimal::ZERO);
        assert_eq!(outcome.status, OutcomeStatus::Neutral);
    }

    #[test]
    fn test_utilities_overrun() {
        let outcome = BudgetOutcome::reconcile(BudgetCategory::Utilities, dec("300"), dec("585.64"));
        assert_eq!(outcome.delta, dec("-285.64"));
        assert_eq!(outcome.status, OutcomeStatus::Overflow);
    }

    #[test]
    fn test_cleaning_overage_billed_against_advance() {
        let mut booking = sample_booking();
        booking.cleaning.advance = dec("250");
        booking.cleaning.included_hours = dec("5");
        booking.cleaning.hourly_rate = dec("50");
        booking.cleaning.actual_hours = dec("7.5");

        let rec = reconcile(&booking);
        assert_eq!(rec.cleaning.actual, dec("125.00"));
        assert_eq!(rec.cleaning.delta, dec("125.00"));
        assert_eq!(rec.cleaning.status, OutcomeStatus::Refund);
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let mut booking = sample_booking();
        booking.utilities.line_items = vec![item("150", "0.21"), item("37.50", "0.09")];

        assert_eq!(reconcile(&booking), reconcile(&booking));
    }

    #[test]
    fn test_neutral_requires_exact_rounded_match() {
        let mut booking = sample_booking();
        booking.deposit.used = dec("500.004");

        let rec = reconcile(&booking);
        // 500 - 500.004 rounds to 0.00: Neutral, not a phantom overflow.
        assert_eq!(rec.deposit.delta, dec("0.00"));
        assert_eq!(rec.deposit.status, OutcomeStatus::Neutral);
    }

    #[test]
    fn test_usage_percentage_caps_and_zero_advance() {
        let over = BudgetOutcome::reconcile(BudgetCategory::Utilities, dec("100"), dec("150"));
        assert_eq!(over.usage_percentage(), dec("100"));
        assert_eq!(over.overflow_percentage(), dec("50"));

        let zero = BudgetOutcome::reconcile(BudgetCategory::Deposit, dec("0"), dec("0"));
        assert_eq!(zero.usage_percentage(), Decimal::ZERO);
        assert_eq!(zero.status, OutcomeStatus::Neutral);

        let zero_over = BudgetOutcome::reconcile(BudgetCategory::Cleaning, dec("0"), dec("40"));
        assert_eq!(zero_over.status, OutcomeStatus::Overflow);
        assert_eq!(zero_over.overflow_percentage(), dec("100"));
    }

    #[test]
    fn test_cleaning_delta_uses_extra_hours_only() {
        let mut booking = sample_booking();
        booking.cleaning.actual_hours = dec("7");

        let rec = reconcile(&booking);
        // 2 extra hours at 40/h against a 120 advance.
        assert_eq!(rec.cleaning.actual, dec("80.00"));
        assert_eq!(rec.cleaning.delta, dec("40.00"));
        assert_eq!(rec.cleaning.status, OutcomeStatus::Refund);
    }
}
