use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, TrendsError};
use crate::models::Day;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Formats Jira uses for `created`, tried after RFC 3339.
///
/// Jira emits the offset without a colon (`+0000`), which strict RFC 3339
/// parsing rejects.
const CREATED_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

/// Parse an issue creation timestamp, keeping the offset it was reported in.
pub fn parse_created(s: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TrendsError::TimestampParse(s.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    for fmt in CREATED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    warn!("could not parse timestamp \"{}\"", s);
    Err(TrendsError::TimestampParse(s.to_string()))
}

/// Parse a `YYYY-M-D` date filter value. Zero padding is optional.
pub fn parse_day(s: &str) -> Result<Day> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TrendsError::InvalidDate(s.to_string()))
}

// ── Day bucketing ─────────────────────────────────────────────────────────────

/// Resolve an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TrendsError::InvalidTimezone(name.to_string()))
}

/// The calendar day an issue was created on.
///
/// Without `tz` the day is taken in the offset the timestamp carries.
pub fn day_of(created: &DateTime<FixedOffset>, tz: Option<Tz>) -> Day {
    match tz {
        Some(tz) => created.with_timezone(&tz).date_naive(),
        None => created.date_naive(),
    }
}
