use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub const CURRENCY_PREFIX: &str = "R$ ";

/// Group the digits of an unsigned integer string with `.` every three places
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

/// Format an amount as Brazilian currency, e.g. `1234.5` -> `R$ 1.234,50`.
///
/// Rounds half-up (away from zero) to two decimal places.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let text = magnitude.to_string();
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!(
        "{}{}{},{}",
        CURRENCY_PREFIX,
        if negative { "-" } else { "" },
        group_thousands(whole),
        frac
    )
}

/// Inverse of [`format_currency`].
pub fn parse_currency(text: &str) -> Option<Decimal> {
    let body = text.trim().strip_prefix(CURRENCY_PREFIX.trim_end())?.trim();
    let plain = body.replace('.', "").replace(',', ".");
    Decimal::from_str(&plain).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_format_currency_examples() {
        assert_eq!(format_currency(dec("1234.5")), "R$ 1.234,50");
        assert_eq!(format_currency(dec("0")), "R$ 0,00");
        assert_eq!(format_currency(dec("100")), "R$ 100,00");
        assert_eq!(format_currency(dec("999.999")), "R$ 1.000,00");
        assert_eq!(format_currency(dec("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec("-1234.5")), "R$ -1.234,50");
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(format_currency(dec("0.005")), "R$ 0,01");
        assert_eq!(format_currency(dec("0.015")), "R$ 0,02");
        assert_eq!(format_currency(dec("0.025")), "R$ 0,03");
        assert_eq!(format_currency(dec("2.675")), "R$ 2,68");
        assert_eq!(format_currency(dec("0.0049")), "R$ 0,00");
        assert_eq!(format_currency(dec("-0.005")), "R$ -0,01");
        assert_eq!(format_currency(dec("-0.004")), "R$ 0,00");
    }

    #[test]
    fn test_group_boundaries() {
        assert_eq!(format_currency(dec("999.99")), "R$ 999,99");
        assert_eq!(format_currency(dec("1000")), "R$ 1.000,00");
        assert_eq!(format_currency(dec("100000")), "R$ 100.000,00");
        assert_eq!(format_currency(dec("1000000")), "R$ 1.000.000,00");
    }

    #[test]
    fn test_parse_recovers_formatted_value() {
        for s in ["0", "0.01", "12.3", "1234.56", "-98765.43", "1000000", "7.005"] {
            let value = dec(s);
            let expected = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            assert_eq!(parse_currency(&format_currency(value)), Some(expected), "{s}");
        }
    }

    #[test]
    fn test_parse_rejects_other_text() {
        assert_eq!(parse_currency("1.234,50"), None);
        assert_eq!(parse_currency("R$ abc"), None);
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2025, 5, 3).unwrap();
        assert_eq!(format_date(d), "03/05/2025");
    }
}
