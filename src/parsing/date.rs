//! Date parsing for Brazilian spreadsheets.
//!
//! Resolution order (first success wins):
//!
//! 1. separate year/month/day cells ([`DateParts`]), month as a Portuguese name or a number
//! 2. `DD/MM/YYYY`, `YYYY-MM-DD`, `DD-MM-YYYY`
//! 3. spreadsheet serial day count (only above 25000, epoch 1899-12-30)
//! 4. generic formats (RFC 3339, RFC 2822, ISO date-times, `YYYY/MM/DD`)
//! 5. the current time ([`ParseMode::Lenient`]) or a failure ([`ParseMode::Strict`])
//!
//! Date-only inputs resolve to midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ParseFailure;

use super::{float_prefix, int_prefix, ParseMode};

/// Serial values at or below this are not read as dates.
const SERIAL_FLOOR: f64 = 25_000.0;
/// Days between 1899-12-30 (spreadsheet epoch) and 1970-01-01.
const SERIAL_UNIX_OFFSET_DAYS: f64 = 25_569.0;

const MONTHS: [(&str, u32); 12] = [
    ("janeiro", 1),
    ("fevereiro", 2),
    ("março", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

/// Year, month and day cells of a daily-aggregated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts<'a> {
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
}

impl<'a> DateParts<'a> {
    pub fn new(year: &'a str, month: &'a str, day: &'a str) -> Self {
        Self { year, month, day }
    }

    /// The calendar date these parts describe, if valid.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = i32::try_from(int_prefix(self.year)?).ok()?;
        let month = month_from_text(self.month)?;
        let day = u32::try_from(int_prefix(self.day)?).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn describe(&self) -> String {
        format!("{}/{}/{}", self.day.trim(), self.month.trim(), self.year.trim())
    }
}

/// Month number from a Portuguese month name (any case) or a numeric string.
pub fn month_from_text(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if let Some((_, n)) = MONTHS.iter().find(|(name, _)| *name == lower) {
        return Some(*n);
    }
    int_prefix(&lower)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| (1..=12).contains(n))
}

/// Parse a date cell into an ISO-8601 timestamp (`YYYY-MM-DDTHH:MM:SS.mmmZ`).
///
/// When `parts` are given and describe a valid date they win. When they are given, invalid, and
/// `text` is blank, the cell is reported as a failure in both modes: bad year/month/day cells
/// are a row problem, not something to paper over with "now".
pub fn parse_date(
    text: &str,
    parts: Option<DateParts<'_>>,
    mode: ParseMode,
) -> Result<String, ParseFailure> {
    resolve_date(text, parts, mode).map(|dt| to_iso_timestamp(&dt))
}

/// Like [`parse_date`] but returns the timestamp itself.
pub fn resolve_date(
    text: &str,
    parts: Option<DateParts<'_>>,
    mode: ParseMode,
) -> Result<DateTime<Utc>, ParseFailure> {
    let text = text.trim();

    if let Some(parts) = parts {
        if let Some(date) = parts.to_date() {
            return Ok(midnight_utc(date));
        }
        if text.is_empty() {
            return Err(ParseFailure::new(
                "date",
                parts.describe(),
                "invalid date components",
            ));
        }
    }

    if !text.is_empty() {
        if let Some(date) = parse_pattern_date(text) {
            return Ok(midnight_utc(date));
        }
        if let Some(dt) = parse_serial(text) {
            return Ok(dt);
        }
        if let Some(dt) = parse_generic(text) {
            return Ok(dt);
        }
    }

    match mode {
        ParseMode::Lenient => Ok(Utc::now()),
        ParseMode::Strict => Err(ParseFailure::new("date", text, "unrecognized date")),
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `DD/MM/YYYY`.
pub fn format_br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[derive(Clone, Copy)]
enum Order {
    DayFirst,
    YearFirst,
}

fn parse_pattern_date(text: &str) -> Option<NaiveDate> {
    const PATTERNS: [(char, Order); 3] = [
        ('/', Order::DayFirst),
        ('-', Order::YearFirst),
        ('-', Order::DayFirst),
    ];
    PATTERNS
        .iter()
        .find_map(|&(sep, order)| match_pattern(text, sep, order))
}

fn match_pattern(text: &str, sep: char, order: Order) -> Option<NaiveDate> {
    let mut pieces = text.split(sep);
    let (a, b, c) = (pieces.next()?, pieces.next()?, pieces.next()?);
    if pieces.next().is_some() {
        return None;
    }

    let short = |s: &str| (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit());
    let year = |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());

    let (y, m, d) = match order {
        Order::DayFirst if short(a) && short(b) && year(c) => (c, b, a),
        Order::YearFirst if year(a) && short(b) && short(c) => (a, b, c),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

fn parse_serial(text: &str) -> Option<DateTime<Utc>> {
    let (serial, _) = float_prefix(text)?;
    if serial <= SERIAL_FLOOR {
        return None;
    }
    let millis = ((serial - SERIAL_UNIX_OFFSET_DAYS) * 86_400.0 * 1_000.0).round();
    DateTime::from_timestamp_millis(millis as i64)
}

fn parse_generic(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y/%m/%d")
        .ok()
        .map(midnight_utc)
}
