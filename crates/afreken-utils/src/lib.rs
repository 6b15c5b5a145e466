//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a money amount to 2 decimal places.
///
/// Applied once, at the point a figure is persisted or displayed —
/// intermediate sums stay unrounded so rounding error never compounds.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a money amount with a currency symbol and configurable
/// separators (e.g., "€ 1.234,56" with Dutch separators).
pub fn format_money(
    amount: Decimal,
    symbol: &str,
    thousands_separator: &str,
    decimal_separator: &str,
) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative();
    let plain = rounded.abs().to_string();
    let (whole, frac) = match plain.split_once('.') {
        Some((w, f)) => (w.to_string(), format!("{:0<2}", f)),
        None => (plain, "00".to_string()),
    };

    let mut grouped = String::new();
    let mut count = 0;
    for c in whole.chars().rev() {
        if count == 3 {
            grouped.push_str(&thousands_separator.chars().rev().collect::<String>());
            count = 0;
        }
        grouped.push(c);
        count += 1;
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    format!("{} {}{}{}{}", symbol, sign, grouped, decimal_separator, frac)
}

/// Dutch-style euro formatting, the default used in run summaries.
pub fn format_eur(amount: Decimal) -> String {
    format_money(amount, "€", ".", ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec("1.005")), dec("1.01"));
        assert_eq!(round_money(dec("-1.005")), dec("-1.01"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_format_eur_grouping() {
        assert_eq!(format_eur(dec("1234.5")), "€ 1.234,50");
        assert_eq!(format_eur(dec("0")), "€ 0,00");
        assert_eq!(format_eur(dec("-160.64")), "€ -160,64");
    }

    #[test]
    fn test_format_money_custom_separators() {
        assert_eq!(format_money(dec("1234567.8"), "$", ",", "."), "$ 1,234,567.80");
    }
}
