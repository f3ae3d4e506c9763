//! REDCap timestamp parsing.
//!
//! Survey and audit timestamps are exported as `YYYY-MM-DD HH:MM:SS` in
//! server-local time without an offset. They are parsed with an explicit
//! format string, never a locale-dependent guesser, and stored as naive
//! epoch milliseconds.

use chrono::{DateTime, NaiveDateTime};

use ctr_model::conventions::{NOT_COMPLETED_MARKER, TIMESTAMP_FORMAT};

/// Outcome of parsing a single timestamp cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampCell {
    /// Empty cell, or a survey REDCap marks as not completed.
    Blank,
    Valid(NaiveDateTime),
    /// Non-blank text that is not a timestamp.
    Invalid,
}

impl TimestampCell {
    pub fn value(self) -> Option<NaiveDateTime> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Blank | Self::Invalid => None,
        }
    }

    pub fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Parses a REDCap timestamp cell.
///
/// # Examples
///
/// ```
/// use ctr_transform::datetime::{TimestampCell, parse_redcap_timestamp};
///
/// assert!(matches!(parse_redcap_timestamp("2024-01-05 10:00:00"), TimestampCell::Valid(_)));
/// assert_eq!(parse_redcap_timestamp("  "), TimestampCell::Blank);
/// assert_eq!(parse_redcap_timestamp("[not completed]"), TimestampCell::Blank);
/// assert_eq!(parse_redcap_timestamp("05/01/2024"), TimestampCell::Invalid);
/// ```
pub fn parse_redcap_timestamp(value: &str) -> TimestampCell {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_COMPLETED_MARKER) {
        return TimestampCell::Blank;
    }
    match NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        Ok(value) => TimestampCell::Valid(value),
        Err(_) => TimestampCell::Invalid,
    }
}

/// Epoch milliseconds of a naive timestamp (interpreted as UTC wall time).
pub fn to_millis(value: NaiveDateTime) -> i64 {
    value.and_utc().timestamp_millis()
}

/// Inverse of [`to_millis`].
pub fn from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|value| value.naive_utc())
}

/// Formats a timestamp in the REDCap export format.
pub fn format_redcap_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
