//! Money amounts as banks actually write them.
//!
//! OFX 1.0.2 says amounts use `.` as the decimal point, but exports from
//! Brazilian banks routinely use `,` with `.` for thousands, and a few vendors
//! add their own damage on top. The steps below run in a fixed order; each one
//! assumes the output of the previous step.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{OfxError, OfxResult};

/// Bank id of the institution that reports amounts already multiplied by 100.
pub const CENTS_SCALED_BANK_ID: &str = "0260";

fn thousands_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d,\d{3}").expect("static pattern compiles"))
}

/// Clean a raw amount into a string `Decimal::from_str` accepts.
///
/// 1. Drop everything but digits, `,`, `.` and `-`.
/// 2. A comma followed by exactly three digits is a thousands separator and
///    is removed. Any other comma is the decimal separator: periods are then
///    thousands separators and go, and the comma becomes a period.
/// 3. A leading `.-` becomes `-`.
/// 4. Amounts from [`CENTS_SCALED_BANK_ID`] are divided by 100.
///
/// Strings that still aren't numbers come back as-is; [`to_decimal`] reports
/// them.
pub fn sanitize_amount(raw: &str, bank_id: &str) -> String {
    let mut s: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if s.contains(',') {
        if thousands_comma_re().is_match(&s) {
            s = s.replace(',', "");
        } else {
            s = s.replace('.', "").replace(',', ".");
        }
    }

    if let Some(rest) = s.strip_prefix(".-") {
        s = format!("-{rest}");
    }

    if bank_id == CENTS_SCALED_BANK_ID {
        if let Ok(mut value) = Decimal::from_str(&s) {
            if value.set_scale(value.scale() + 2).is_ok() {
                s = value.to_string();
            }
        }
    }

    s
}

/// Sanitize and parse an amount.
pub fn to_decimal(raw: &str, bank_id: &str) -> OfxResult<Decimal> {
    let sanitized = sanitize_amount(raw, bank_id);
    tracing::trace!(raw, sanitized = %sanitized, "sanitized amount");

    Decimal::from_str(&sanitized).map_err(|_| OfxError::InvalidAmount {
        raw: raw.to_string(),
        sanitized,
    })
}

/// Amount in minor units (cents): `amount * 100`, truncated toward zero.
pub fn to_minor_units(amount: Decimal) -> OfxResult<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .ok_or(OfxError::AmountOutOfRange(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_us_and_brazilian_separators_agree() {
        assert_eq!(to_decimal("1,234.56", "").unwrap(), dec("1234.56"));
        assert_eq!(to_decimal("1.234,56", "").unwrap(), dec("1234.56"));
        assert_eq!(to_decimal("1.234.567,89", "").unwrap(), dec("1234567.89"));
    }

    #[test]
    fn test_strips_currency_symbols_and_spaces() {
        assert_eq!(sanitize_amount("R$ -50,00", ""), "-50.00");
        assert_eq!(sanitize_amount("$ 1,000.00", ""), "1000.00");
        assert_eq!(sanitize_amount("+12.5", ""), "12.5");
    }

    #[test]
    fn test_plain_decimal_is_untouched() {
        assert_eq!(sanitize_amount("-100.00", ""), "-100.00");
        assert_eq!(sanitize_amount("1,234", ""), "1234");
    }

    #[test]
    fn test_relocates_minus_after_period() {
        assert_eq!(sanitize_amount(".-50", ""), "-50");
        assert_eq!(to_decimal(".-50", "").unwrap(), dec("-50"));
    }

    #[test]
    fn test_cents_scaled_bank_is_divided_by_100() {
        assert_eq!(sanitize_amount("100", CENTS_SCALED_BANK_ID), "1.00");
        assert_eq!(to_decimal("100", CENTS_SCALED_BANK_ID).unwrap(), dec("1.00"));
        assert_eq!(to_decimal("-2550", CENTS_SCALED_BANK_ID).unwrap(), dec("-25.50"));
        assert_eq!(to_decimal("100", "0341").unwrap(), dec("100"));
    }

    #[test]
    fn test_garbage_is_reported() {
        let err = to_decimal("N/A", "").unwrap_err();
        assert_eq!(
            err,
            OfxError::InvalidAmount {
                raw: "N/A".to_string(),
                sanitized: String::new(),
            }
        );
        assert!(to_decimal("", "").is_err());
        assert!(to_decimal("1.2.3", "").is_err());
    }

    #[test]
    fn test_minor_units_truncate_toward_zero() {
        assert_eq!(to_minor_units(dec("1234.56")).unwrap(), 123456);
        assert_eq!(to_minor_units(dec("-0.019")).unwrap(), -1);
        assert_eq!(to_minor_units(dec("10.999")).unwrap(), 1099);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_minor_units_overflow() {
        assert_eq!(
            to_minor_units(Decimal::MAX),
            Err(OfxError::AmountOutOfRange(Decimal::MAX))
        );
    }
}
