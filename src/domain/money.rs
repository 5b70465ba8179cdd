//! Amount coercion and currency formatting.
//!
//! Amounts are entered in dollars and persisted as integer cents. Conversion rounds half away
//! from zero on the cents value, so `0.125` becomes 13 cents and `49.99` becomes 4999.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Largest amount (in cents) an `INTEGER` amount column can hold.
pub const MAX_CENTS: i64 = i32::MAX as i64;

/// Coerces a submitted amount to a decimal number.
///
/// Blank input coerces to zero; anything unparsable (including `NaN` and infinities) is `None`.
/// Neither passes a "greater than zero" check. Scientific notation is accepted.
pub fn coerce_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Converts a dollar amount to whole cents, rounding half away from zero.
///
/// `None` if the cents value does not fit an `i64`.
pub fn dollars_to_cents(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

pub fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Formats cents as US dollars, e.g. `123456` -> `$1,234.56`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn coercion_follows_numeric_parsing() {
        assert_eq!(coerce_amount("49.99"), Some(dec("49.99")));
        assert_eq!(coerce_amount(" 12 "), Some(dec("12")));
        assert_eq!(coerce_amount(""), Some(Decimal::ZERO));
        assert_eq!(coerce_amount("1e2"), Some(dec("100")));
        assert_eq!(coerce_amount("twelve"), None);
        assert_eq!(coerce_amount("$5"), None);
        assert_eq!(coerce_amount("NaN"), None);
        assert_eq!(coerce_amount("inf"), None);
    }

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(dollars_to_cents(dec("49.99")), Some(4999));
        assert_eq!(dollars_to_cents(dec("0.125")), Some(13));
        assert_eq!(dollars_to_cents(dec("-0.125")), Some(-13));
        assert_eq!(dollars_to_cents(dec("1.005")), Some(101));
        assert_eq!(dollars_to_cents(dec("0.285")), Some(29));
        assert_eq!(dollars_to_cents(dec("10")), Some(1000));
        assert_eq!(dollars_to_cents(dec("0.004")), Some(0));
        assert_eq!(dollars_to_cents(Decimal::MAX), None);
    }

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(0), "$0.00");
        assert_eq!(format_currency(5), "$0.05");
        assert_eq!(format_currency(4999), "$49.99");
        assert_eq!(format_currency(123_456), "$1,234.56");
        assert_eq!(format_currency(100_000_000), "$1,000,000.00");
        assert_eq!(format_currency(-123_456), "-$1,234.56");
    }

    #[test]
    fn dollars_from_cents() {
        assert_eq!(cents_to_dollars(4999), dec("49.99"));
        assert_eq!(cents_to_dollars(1250), dec("12.5"));
    }
}
