//! Parsing of `since` filter strings.

use crate::error::{AuditError, AuditResult};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses a `since` filter: either a relative duration shorthand
/// (`"7d"`, `"24h"`, `"30m"`) or an absolute date/time (`"2026-01-31"`,
/// `"2026-01-31 12:00:00"`, or RFC 3339). Naive date/times are read as
/// UTC.
///
/// # Errors
///
/// Returns [`AuditError::InvalidSince`] naming the accepted formats when
/// the text matches none of them.
pub fn parse_since(text: &str) -> AuditResult<DateTime<Utc>> {
    let trimmed = text.trim();

    if let Some(duration) = parse_relative(trimmed) {
        return Ok(Utc::now() - duration);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    Err(AuditError::InvalidSince(text.to_string()))
}

fn parse_relative(text: &str) -> Option<Duration> {
    if let Some(days) = text.strip_suffix('d') {
        return days.parse::<u32>().ok().map(|n| Duration::days(n.into()));
    }
    if let Some(hours) = text.strip_suffix('h') {
        return hours.parse::<u32>().ok().map(|n| Duration::hours(n.into()));
    }
    if let Some(minutes) = text.strip_suffix('m') {
        return minutes
            .parse::<u32>()
            .ok()
            .map(|n| Duration::minutes(n.into()));
    }
    None
}
