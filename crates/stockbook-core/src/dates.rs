//! # Calendar Dates
//!
//! Normalization of caller-supplied as-of values into calendar days.
//!
//! The ledger stores plain `yyyy-MM-dd` days with no time component, so any
//! as-of bound is reduced to a day before it is compared:
//!
//! | Input                         | Normalized   |
//! |-------------------------------|--------------|
//! | `2024-01-31`                  | `2024-01-31` |
//! | `2024-01-31T18:45:00`         | `2024-01-31` |
//! | `2024-01-31 18:45`            | `2024-01-31` |
//! | `2024-01-31T23:30:00+03:00`   | `2024-01-31` (day as written) |
//! | `2024-01`                     | `2024-01-01` |
//! | `2024`                        | `2024-01-01` |
//! | empty / absent                | no bound     |

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;
use crate::validation::ValidationResult;
use crate::DATE_FORMAT;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a date, date-time or partial date into a calendar day.
pub fn normalize_day(input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::required("date"));
    }

    // chrono's %Y takes any digit count, so "24-01-01" would be year 24.
    if !has_four_digit_year(input) {
        return Err(unrecognized(input));
    }

    if let Ok(day) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Ok(day);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(stamp.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(stamp.date());
        }
    }

    parse_partial(input).ok_or_else(|| unrecognized(input))
}

fn has_four_digit_year(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() >= 4
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes.get(4).map_or(true, |&next| next == b'-')
}

fn unrecognized(input: &str) -> ValidationError {
    ValidationError::invalid_format("date", format!("'{}' is not a recognizable date", input))
}

/// Normalizes an optional as-of bound. `None` and blank strings mean
/// "no upper bound".
pub fn normalize_as_of(input: Option<&str>) -> ValidationResult<Option<NaiveDate>> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_day(value).map(Some).map_err(|err| match err {
            ValidationError::InvalidFormat { reason, .. } => {
                ValidationError::invalid_format("as_of", reason)
            }
            other => other,
        }),
    }
}

/// Formats a day the way it is stored (`yyyy-MM-dd`).
pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// `yyyy-MM` and `yyyy` resolve to the first day of the period.
fn parse_partial(input: &str) -> Option<NaiveDate> {
    let mut parts = input.splitn(2, '-');
    let year_part = parts.next()?;
    if year_part.len() != 4 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;

    let month = match parts.next() {
        Some(month) if (1..=2).contains(&month.len()) => month.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
