//! Loosely-typed cell values and total coercions
//!
//! Sheet authors mix text, numbers and blanks freely, so every cell is
//! modeled as an explicit variant and coerced with functions that
//! return a typed failure instead of panicking. Failed coercions feed
//! the skip-and-warn policy of the batch run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RowError;

/// One spreadsheet cell as loaded from the input sheet.
///
/// Serde is untagged so a JSON row is a plain array of
/// `number | string | null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric cell
    Number(Decimal),
    /// Text cell
    Text(String),
    /// Blank cell
    Empty,
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// True for blank cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Trimmed text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t)
                }
            }
            _ => None,
        }
    }

    /// Coerce to a decimal amount.
    ///
    /// Accepts numeric cells directly and money-formatted text in both
    /// sheet styles seen in practice: "€ 1.234,56" (Dutch separators)
    /// and "585.64". A blank cell is a `MissingField` failure — callers
    /// that treat blank as zero use [`CellValue::as_decimal_or_zero`].
    pub fn as_decimal(&self, field: &str) -> Result<Decimal, RowError> {
        match self {
            CellValue::Number(d) => Ok(*d),
            CellValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return Err(RowError::MissingField {
                        field: field.to_string(),
                    });
                }
                parse_money_text(t).ok_or_else(|| RowError::NotANumber {
                    field: field.to_string(),
                    value: s.clone(),
                })
            }
            CellValue::Empty => Err(RowError::MissingField {
                field: field.to_string(),
            }),
        }
    }

    /// Like [`CellValue::as_decimal`] but blank cells count as zero.
    pub fn as_decimal_or_zero(&self, field: &str) -> Result<Decimal, RowError> {
        if self.is_blank() {
            Ok(Decimal::ZERO)
        } else {
            self.as_decimal(field)
        }
    }

    /// Coerce to a calendar date. Accepts ISO ("2025-03-01") and the
    /// Dutch sheet style ("01-03-2025").
    pub fn as_date(&self, field: &str) -> Result<NaiveDate, RowError> {
        let text = match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(d) => d.to_string(),
            CellValue::Empty => {
                return Err(RowError::MissingField {
                    field: field.to_string(),
                })
            }
        };

        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&text, "%d-%m-%Y"))
            .map_err(|_| RowError::NotADate {
                field: field.to_string(),
                value: text,
            })
    }
}

/// Parse money-formatted text into a decimal.
///
/// Strips the euro sign and whitespace, then disambiguates separators:
/// if both '.' and ',' appear, the last one is the decimal separator;
/// a lone ',' is a decimal comma.
fn parse_money_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');

    let normalized = if has_dot && has_comma {
        let last_dot = cleaned.rfind('.').unwrap_or(0);
        let last_comma = cleaned.rfind(',').unwrap_or(0);
        if last_comma > last_dot {
            // "1.234,56" - dots group, comma is decimal
            cleaned.replace('.', "").replace(',', ".")
        } else {
            // "1,234.56" - commas group, dot is decimal
            cleaned.replace(',', "")
        }
    } else if has_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse::<Decimal>().ok()
}
