//! Row kinds and per-kind column layouts
//!
//! All record kinds share one flat sheet, so each kind populates its
//! own fixed slice of the row. The offsets below are the single source
//! of truth: no other module indexes a row by number.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Width every row is padded to before field extraction.
pub const ROW_WIDTH: usize = 43;

/// Record kind of one sheet row.
///
/// Parsed from the discriminator column; `Extra` is a legacy alias
/// some sheets still use for damage lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    /// Booking header: period and the three prepaid advances
    Basis,
    /// Raw utility meter readings (informational, never priced)
    Meter,
    /// One priced utility or fixed-fee line
    UtilityItem,
    /// Cleaning package: hours and rate
    Cleaning,
    /// One priced damage line
    Damage,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Basis => "Basis",
            RowKind::Meter => "GWE",
            RowKind::UtilityItem => "GWE_Item",
            RowKind::Cleaning => "Schoonmaak",
            RowKind::Damage => "Schade",
        }
    }
}

impl FromStr for RowKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basis" => Ok(RowKind::Basis),
            "GWE" => Ok(RowKind::Meter),
            "GWE_Item" => Ok(RowKind::UtilityItem),
            "Schoonmaak" => Ok(RowKind::Cleaning),
            "Schade" | "Extra" => Ok(RowKind::Damage),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shared columns present on every row.
pub mod shared {
    /// Property address / grouping key
    pub const ADDRESS: usize = 0;
    /// Kind discriminator
    pub const KIND: usize = 1;
}

/// Column layout for `Basis` rows.
pub mod basis {
    pub const CLIENT: usize = 2;
    pub const CHECK_IN: usize = 7;
    pub const CHECK_OUT: usize = 8;
    pub const DEPOSIT_ADVANCE: usize = 9;
    pub const DEPOSIT_USED: usize = 10;
    pub const UTILITIES_ADVANCE: usize = 14;
    pub const CLEANING_ADVANCE: usize = 17;
}

/// Column layout for `GWE` meter rows (begin/end per utility).
pub mod meter {
    pub const ELECTRICITY_BEGIN: usize = 21;
    pub const ELECTRICITY_END: usize = 22;
    pub const GAS_BEGIN: usize = 23;
    pub const GAS_END: usize = 24;
    pub const WATER_BEGIN: usize = 25;
    pub const WATER_END: usize = 26;
}

/// Column layout for `Schoonmaak` rows.
pub mod cleaning {
    pub const LABEL: usize = 27;
    pub const INCLUDED_HOURS: usize = 28;
    pub const HOURLY_RATE: usize = 29;
    pub const ACTUAL_HOURS: usize = 30;
}

/// Column layout shared by `GWE_Item` and `Schade` rows.
pub mod item {
    pub const DESCRIPTION: usize = 36;
    pub const QUANTITY: usize = 37;
    pub const UNIT_PRICE: usize = 38;
    pub const VAT_RATE: usize = 40;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminator_round_trip() {
        for disc in ["Basis", "GWE", "GWE_Item", "Schoonmaak", "Schade"] {
            let kind: RowKind = disc.parse().unwrap();
            assert_eq!(kind.as_str(), disc);
        }
    }

    #[test]
    fn test_extra_is_damage_alias() {
        assert_eq!("Extra".parse::<RowKind>(), Ok(RowKind::Damage));
    }

    #[test]
    fn test_unknown_discriminator_rejected() {
        assert!("Totaal".parse::<RowKind>().is_err());
        assert!("".parse::<RowKind>().is_err());
    }
}
