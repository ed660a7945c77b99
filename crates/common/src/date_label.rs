//! Spreadsheet date cells to date-picker button labels

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;

use crate::cell::CellValue;
use crate::error::{Error, Result};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Day zero of the 1900 date system as used by serial numbers (1899-12-30).
static SERIAL_EPOCH: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .map(|d| d.and_time(NaiveTime::MIN))
        .unwrap_or_default()
});

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%a %b %d %Y",
];

/// Convert a serial day count (fractions allowed) to a date-time.
pub fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let ms = (serial * MS_PER_DAY).round();
    if ms.abs() > i64::MAX as f64 {
        return None;
    }
    SERIAL_EPOCH.checked_add_signed(Duration::try_milliseconds(ms as i64)?)
}

/// Parse a date string in any of the forms spreadsheets and people commonly
/// type.
pub fn parse_date_str(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_utc());
    }

    // `Date#toString`: "Mon Aug 14 2023 00:00:00 GMT+0200 (Central European Summer Time)"
    let s = s.split(" GMT").next().unwrap_or(s);
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%a %b %d %Y %H:%M:%S") {
        return Some(dt);
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Interpret a cell as a date: native dates as-is, numbers as serial days,
/// strings through [`parse_date_str`].
pub fn to_date(value: &CellValue) -> Result<NaiveDateTime> {
    let parsed = match value {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => from_serial(*n),
        CellValue::String(s) => parse_date_str(s),
        CellValue::Empty => None,
    };
    parsed.ok_or_else(|| Error::DateParse(value.to_text()))
}

/// The accessible name of a calendar day button, e.g. `"Aug 14,"`.
///
/// The trailing comma is part of the label the date picker exposes.
pub fn format_label(date: &NaiveDateTime) -> String {
    date.format("%b %-d,").to_string()
}

/// Convert a cell straight to its date-picker label.
pub fn calendar_button_label(value: &CellValue) -> Result<String> {
    to_date(value).map(|d| format_label(&d))
}
