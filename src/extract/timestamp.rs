//! Record timestamp handling
//!
//! The upstream service emits `createdAt` values in a loosely ISO-8601
//! variant and occasionally truncates the UTC offset to `+00:0` (one digit
//! short). The repair and the parse both live here so the walk only deals in
//! calendar dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;

/// Suffix the service emits when it drops the final offset digit
const TRUNCATED_UTC_SUFFIX: &str = "+00:0";

/// Repair a truncated `+00:0` offset suffix to `+00:00`.
///
/// Anything else passes through untouched, including already-correct
/// `+00:00` suffixes (their last five characters are `0:00`).
pub fn normalize_offset(timestamp: &str) -> Cow<'_, str> {
    if timestamp.ends_with(TRUNCATED_UTC_SUFFIX) {
        Cow::Owned(format!("{timestamp}0"))
    } else {
        Cow::Borrowed(timestamp)
    }
}

/// Parse a record timestamp into its calendar date.
///
/// Tries RFC 3339 first, then falls back to an offset-less
/// `%Y-%m-%dT%H:%M:%S%.f`. The result is the as-written local date: a record
/// stamped `2024-03-01T23:30:00+05:30` belongs to 2024-03-01.
///
/// Returns `None` on any parse failure; the caller skips such records.
pub fn parse_record_date(timestamp: &str) -> Option<NaiveDate> {
    let normalized = normalize_offset(timestamp);

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    // Bare calendar dates also occur in the wild
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
}
