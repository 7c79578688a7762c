//! Time parsing and derivation helpers.
//!
//! Source exports carry ISO 8601 strings in several flavors: full RFC 3339
//! with an offset, naive date-times (Graph-style exports emit these inside
//! dateTime/timeZone objects), and bare dates. Everything normalizes to
//! UTC; naive values are taken as UTC directly.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// Current time in epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a source datetime string into a UTC instant.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`, offsets included), naive
/// date-times (`2024-03-01T10:00:00` with optional fractional seconds),
/// and bare dates (`2024-03-01`, taken as midnight).
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    None
}

/// Parse a source datetime string into epoch milliseconds.
pub fn parse_ms(s: &str) -> Option<i64> {
    parse_utc(s).map(|dt| dt.timestamp_millis())
}

/// Parse an optional datetime string, substituting `fallback` when the
/// value is absent or unparseable.
pub fn parse_ms_or(value: Option<&str>, fallback: i64) -> i64 {
    value.and_then(parse_ms).unwrap_or(fallback)
}

/// Format a UTC instant as a calendar day string (`YYYY-MM-DD`).
pub fn day_string(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Seconds elapsed since midnight for the instant's time-of-day.
pub fn seconds_into_day(dt: &DateTime<Utc>) -> u32 {
    dt.time().num_seconds_from_midnight()
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Build a date from a year/month and a possibly out-of-range day of
/// month, clamping the day to the month's last valid day. Returns `None`
/// for days below 1 or unusable year/month input.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Weekday index with Monday as 0 and Sunday as 6.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}
