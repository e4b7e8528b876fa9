//! Brazilian currency/decimal parsing.

use crate::error::ParseFailure;

use super::{float_prefix, ParseMode};

/// Parse a Brazilian-formatted money value (`R$ 1.234,56`) into a number.
///
/// Strips `R`, `$` and whitespace, removes every `.` (thousands separator), turns the first
/// `,` into the decimal point and reads the leading number. Empty or unparsable text yields `0`.
///
/// The separator handling assumes Brazilian notation: `"1234.56"` reads as `123456`. Sheet
/// readers in [`crate::ingestion`] hand numeric cells over as `1234,56` for that reason.
pub fn parse_monetary(text: &str) -> f64 {
    parse_monetary_with(text, ParseMode::Lenient).unwrap_or(0.0)
}

/// [`parse_monetary`] with an explicit [`ParseMode`].
///
/// In strict mode, non-empty text without a leading number, or with characters left over after
/// it, is a failure. Blank text is `0` in both modes.
pub fn parse_monetary_with(text: &str, mode: ParseMode) -> Result<f64, ParseFailure> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Ok(0.0);
    }

    match (float_prefix(&normalized), mode) {
        (Some((value, _)), ParseMode::Lenient) => Ok(value),
        (None, ParseMode::Lenient) => Ok(0.0),
        (Some((value, end)), ParseMode::Strict) if end == normalized.len() => Ok(value),
        (Some(_), ParseMode::Strict) => Err(ParseFailure::new(
            "value",
            text,
            "unexpected characters after number",
        )),
        (None, ParseMode::Strict) => Err(ParseFailure::new("value", text, "not a number")),
    }
}

fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, 'R' | '$') && !c.is_whitespace())
        .collect();
    stripped.replace('.', "").replacen(',', ".", 1)
}

/// Two decimals with a comma separator (`14.155` → `"14,16"`), as written in exported sheets.
pub fn format_decimal_comma(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}
