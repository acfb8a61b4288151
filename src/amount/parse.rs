//! Amount parsing with `k`/`m`/`b` shorthand.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 2^63, the first f64 above the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Multiplier for a trailing shorthand letter, if it is one.
fn suffix_multiplier(suffix: char) -> Option<i64> {
    match suffix.to_ascii_lowercase() {
        'k' => Some(1_000),
        'm' => Some(1_000_000),
        'b' => Some(1_000_000_000),
        _ => None,
    }
}

/// Parse a human-entered amount.
///
/// Commas are ignored. A single trailing `k`, `m` or `b` (any case) scales the
/// preceding number, which may be fractional; the scaled value is truncated
/// toward zero. Without a suffix the input must be a base-10 integer.
///
/// Sign is preserved; rejecting non-positive amounts is the caller's job.
pub fn parse_amount(input: &str) -> Result<i64> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let invalid = || Error::InvalidFormat(input.to_string());

    let last = cleaned.chars().last().ok_or_else(invalid)?;

    let Some(multiplier) = suffix_multiplier(last) else {
        return cleaned.parse::<i64>().map_err(|_| invalid());
    };

    let body = cleaned[..cleaned.len() - last.len_utf8()].trim();
    let value: f64 = body.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    let scaled = (value * multiplier as f64).trunc();
    if !(-I64_BOUND..I64_BOUND).contains(&scaled) {
        return Err(invalid());
    }

    Ok(scaled as i64)
}

/// A command option value that may arrive already typed as an integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountArg {
    Integer(i64),
    Text(String),
}

impl AmountArg {
    /// Integers pass through unchanged; text goes through [`parse_amount`].
    pub fn resolve(&self) -> Result<i64> {
        match self {
            AmountArg::Integer(n) => Ok(*n),
            AmountArg::Text(s) => parse_amount(s),
        }
    }
}

impl From<i64> for AmountArg {
    fn from(n: i64) -> Self {
        AmountArg::Integer(n)
    }
}

impl From<&str> for AmountArg {
    fn from(s: &str) -> Self {
        AmountArg::Text(s.to_string())
    }
}

impl From<String> for AmountArg {
    fn from(s: String) -> Self {
        AmountArg::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(input: &str) {
        match parse_amount(input) {
            Err(Error::InvalidFormat(raw)) => assert_eq!(raw, input),
            other => panic!("expected InvalidFormat for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_plain_integers() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount("42").unwrap(), 42);
        assert_eq!(parse_amount(" 42 ").unwrap(), 42);
        assert_eq!(parse_amount("-5").unwrap(), -5);
    }

    #[test]
    fn test_commas_stripped() {
        assert_eq!(parse_amount("1,000").unwrap(), 1_000);
        assert_eq!(parse_amount("12,345,678").unwrap(), 12_345_678);
        assert_eq!(parse_amount("1,500k").unwrap(), 1_500_000);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_amount("10k").unwrap(), 10_000);
        assert_eq!(parse_amount("10K").unwrap(), 10_000);
        assert_eq!(parse_amount("5M").unwrap(), 5_000_000);
        assert_eq!(parse_amount("5m").unwrap(), 5_000_000);
        assert_eq!(parse_amount("1b").unwrap(), 1_000_000_000);
        assert_eq!(parse_amount("1B").unwrap(), 1_000_000_000);
    }

    #[test]
    fn test_fractional_suffix_truncates() {
        assert_eq!(parse_amount("2.5k").unwrap(), 2_500);
        assert_eq!(parse_amount("1.25m").unwrap(), 1_250_000);
        assert_eq!(parse_amount("0.0005k").unwrap(), 0);
        assert_eq!(parse_amount("-2.5k").unwrap(), -2_500);
    }

    #[test]
    fn test_rejects_malformed() {
        assert_invalid("");
        assert_invalid("   ");
        assert_invalid(",");
        assert_invalid("abc");
        assert_invalid("10x");
        assert_invalid("k");
        assert_invalid("10kk");
        assert_invalid("10mk");
        assert_invalid("1.5");
        assert_invalid("infk");
        assert_invalid("nank");
    }

    #[test]
    fn test_digit_underscores_rejected() {
        assert_invalid("1_000");
        assert_invalid("1_5k");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_invalid("99999999999999999999");
        assert_invalid("10000000000b");
        assert_eq!(parse_amount("9b").unwrap(), 9_000_000_000);
    }

    #[test]
    fn test_amount_arg() {
        assert_eq!(AmountArg::from(17).resolve().unwrap(), 17);
        assert_eq!(AmountArg::from("3k").resolve().unwrap(), 3_000);

        let typed: AmountArg = serde_json::from_str("250").unwrap();
        assert_eq!(typed, AmountArg::Integer(250));
        let text: AmountArg = serde_json::from_str("\"2.5k\"").unwrap();
        assert_eq!(text.resolve().unwrap(), 2_500);
    }
}
