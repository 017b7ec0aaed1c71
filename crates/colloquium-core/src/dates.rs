//! # Date Normalization
//!
//! Registry dates are written `YYYY-MM-DD`, spreadsheet exports write
//! `M/D/YYYY`. Two date strings denote the same day iff their canonical
//! forms are identical.
//!
//! ## Rules (in order)
//!
//! 1. Contains `/` and splits into exactly 3 parts: month, day, year.
//!    Month and day are zero-padded to width 2, the year is emitted as-is.
//! 2. Already `YYYY-MM-DD`: returned unchanged.
//! 3. Anything a general date parser accepts: emitted as `YYYY-MM-DD`.
//! 4. Otherwise the input is returned unchanged.
//!
//! A two-digit year is not expanded: `5/21/24` becomes `24-05-21`.

use crate::primitives::CANONICAL_DATE_FORMAT;
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static CANONICAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("canonical date pattern is valid"));

/// The general parser only runs on input that spells out a 4-digit year.
static FOUR_DIGIT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\D)\d{4}(\D|$)").expect("year pattern is valid"));

/// Date-time shapes tried by the general parser.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only shapes tried by the general parser.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Produce the canonical `YYYY-MM-DD` form of `input`.
///
/// Never fails: input that cannot be interpreted is returned unchanged.
#[must_use]
pub fn normalize_date(input: &str) -> String {
    let trimmed = input.trim();

    if trimmed.contains('/') {
        let parts: Vec<&str> = trimmed.split('/').collect();
        if let [month, day, year] = parts.as_slice() {
            return format!("{}-{:0>2}-{:0>2}", year.trim(), month.trim(), day.trim());
        }
    }

    if CANONICAL_DATE.is_match(trimmed) {
        return trimmed.to_string();
    }

    match parse_general(trimmed) {
        Some(day) => day.format(CANONICAL_DATE_FORMAT).to_string(),
        None => input.to_string(),
    }
}

/// True iff both strings normalize to the same canonical form.
#[must_use]
pub fn same_day(a: &str, b: &str) -> bool {
    normalize_date(a) == normalize_date(b)
}

/// Normalize and parse into a calendar day.
#[must_use]
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&normalize_date(input), CANONICAL_DATE_FORMAT).ok()
}

/// Format a day canonically.
#[must_use]
pub fn canonical(day: NaiveDate) -> String {
    day.format(CANONICAL_DATE_FORMAT).to_string()
}

/// The last second of `day` (23:59:59).
#[must_use]
pub fn end_of_day(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(23, 59, 59)
}

/// `today + days`; negative offsets go backwards. `None` on overflow.
#[must_use]
pub fn offset_days(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        today.checked_add_days(magnitude)
    } else {
        today.checked_sub_days(magnitude)
    }
}

/// "Tuesday, May 21, 2024"
#[must_use]
pub fn long_date(day: NaiveDate) -> String {
    day.format("%A, %B %-d, %Y").to_string()
}

/// "Tuesday, May 21"
#[must_use]
pub fn weekday_month_day(day: NaiveDate) -> String {
    day.format("%A, %B %-d").to_string()
}

/// [`long_date`] for a raw date string, or the raw string if it is not a day.
#[must_use]
pub fn long_date_or_raw(input: &str) -> String {
    parse_day(input).map(long_date).unwrap_or_else(|| input.to_string())
}

fn parse_general(input: &str) -> Option<NaiveDate> {
    if !FOUR_DIGIT_YEAR.is_match(input) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}

// =============================================================================
// TESTS
// =============================================================================
