//! Locale-aware cell parsers.
//!
//! Spreadsheet cells arrive as text in Brazilian notation (`1.234,56`, `15/03/2024`,
//! `Janeiro`). The parsers here turn them into numbers and ISO-8601 timestamps.
//!
//! - [`monetary`]: currency/decimal values
//! - [`date`]: calendar dates from text, spreadsheet serials or year/month/day parts
//!
//! Both parsers follow a [`ParseMode`]. In [`ParseMode::Lenient`] (the default) unparsable
//! numbers become `0` and unparsable dates become the current time, so a malformed cell never
//! stops an import. [`ParseMode::Strict`] reports a [`crate::error::ParseFailure`] instead.

pub mod date;
pub mod monetary;

pub use date::{format_br_date, month_from_text, parse_date, to_iso_timestamp, DateParts};
pub use monetary::{format_decimal_comma, parse_monetary, parse_monetary_with};

/// How parsers treat text they cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Fall back silently: numbers to `0`, dates to "now".
    #[default]
    Lenient,
    /// Report a parse failure for the cell.
    Strict,
}

/// Leading decimal number of `text`; anything after it is ignored.
///
/// Leading whitespace is skipped; the number may carry a sign, a `.` fraction and an exponent.
/// Returns the value and the byte offset where the number ends.
pub(crate) fn float_prefix(text: &str) -> Option<(f64, usize)> {
    let s = text.trim_start();
    let offset = text.len() - s.len();
    let bytes = s.as_bytes();

    let mut end = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = &s[int_start..end];

    let mut frac_digits = "";
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if !int_digits.is_empty() || j > frac_start {
            frac_digits = &s[frac_start..j];
            end = j;
        }
    }
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            exponent = &s[end..j];
            end = j;
        }
    }

    let normalized = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        exponent
    );
    normalized.parse::<f64>().ok().map(|v| (v, offset + end))
}

/// Leading base-10 integer of `text`; `"2.9"` reads as `2`.
///
/// A digit run too long for `i64` saturates to `i64::MAX` (or `-i64::MAX`).
pub(crate) fn int_prefix(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let value = digits[..len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::{float_prefix, int_prefix};

    #[test]
    fn float_prefix_reads_leading_number_only() {
        assert_eq!(float_prefix("12.5abc"), Some((12.5, 4)));
        assert_eq!(float_prefix("  -3"), Some((-3.0, 4)));
        assert_eq!(float_prefix(".5"), Some((0.5, 2)));
        assert_eq!(float_prefix("7."), Some((7.0, 2)));
        assert_eq!(float_prefix("1e3x"), Some((1000.0, 3)));
        assert_eq!(float_prefix("1e"), Some((1.0, 1)));
        assert_eq!(float_prefix("abc"), None);
        assert_eq!(float_prefix("-"), None);
        assert_eq!(float_prefix(""), None);
    }

    #[test]
    fn int_prefix_stops_at_first_non_digit() {
        assert_eq!(int_prefix("3"), Some(3));
        assert_eq!(int_prefix(" 2024 "), Some(2024));
        assert_eq!(int_prefix("2.9"), Some(2));
        assert_eq!(int_prefix("-4"), Some(-4));
        assert_eq!(int_prefix("x1"), None);
        assert_eq!(int_prefix("99999999999999999999"), Some(i64::MAX));
        assert_eq!(int_prefix("-99999999999999999999"), Some(-i64::MAX));
        assert_eq!(int_prefix(""), None);
    }
}
