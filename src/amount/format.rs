//! Thousands-separated number rendering.

/// Digit group separator.
const SEPARATOR: char = ',';

/// Render `n` with digits grouped in threes, e.g. `1234567` as `1,234,567`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(100_000), "100,000");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_number(-1), "-1");
        assert_eq!(format_number(-1_500), "-1,500");
        assert_eq!(format_number(i64::MIN), "-9,223,372,036,854,775,808");
        assert_eq!(format_number(i64::MAX), "9,223,372,036,854,775,807");
    }
}
