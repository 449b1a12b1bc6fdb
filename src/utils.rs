//! Conversions between currency text and integer minor units.

use crate::{Error, ErrorType, Source};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Parses a decimal string such as `1,234.56` into minor units (`123456`).
/// Thousands separators are ignored; a fraction, if present, must have
/// exactly two digits.
pub fn parse_amount(num_str: &str, src: &Source) -> Result<i64, Error> {
    let invalid = || {
        Error::new(
            ErrorType::Syntax,
            format!("Invalid amount: {}.", num_str),
            src.clone(),
        )
    };
    let digits = num_str.replace(',', "");
    if let Some((_, fraction)) = digits.split_once('.') {
        if fraction.len() != 2 {
            return Err(invalid());
        }
    }
    let number = digits.parse::<Decimal>().map_err(|_| invalid())?;
    // i64::MIN has no positive counterpart, so it cannot change sides.
    number
        .checked_mul(Decimal::new(100, 0))
        .and_then(|minor| minor.to_i64())
        .filter(|minor| *minor != i64::MIN)
        .ok_or_else(|| {
            Error::new(
                ErrorType::Syntax,
                format!("Amount out of range: {}.", num_str),
                src.clone(),
            )
        })
}

/// Formats minor units with exactly two decimals, e.g. `-50` as `-0.50`.
/// Accepts `i128` so report totals over many `i64` amounts print as is.
pub fn format_amount(value: impl Into<i128>) -> String {
    let value = value.into();
    match Decimal::try_from_i128_with_scale(value, 2) {
        Ok(decimal) => decimal.to_string(),
        Err(_) => format!("{}.{:02}", value / 100, (value % 100).abs()),
    }
}
