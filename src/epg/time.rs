//! Timestamp normalization to the XMLTV form `yyyyMMddHHmmss +0000`

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

/// XMLTV consumers expect exactly this layout, always in UTC
const XMLTV_FORMAT: &str = "%Y%m%d%H%M%S +0000";

/// Zoned layouts; `%#z` takes `+01`, `+0100` and `+01:00`
const ZONED_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y%m%dT%H%M%S%#z",
];

/// Naive layouts tried after the zoned parsers; interpreted as UTC
const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

/// A canonical XMLTV timestamp. Only built by the normalizers below.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    fn from_utc(dt: DateTime<Utc>) -> Self {
        Timestamp(dt.format(XMLTV_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a base-10 count of seconds since the Unix epoch
pub fn normalize_unix_seconds(value: &str) -> Option<Timestamp> {
    let secs: i64 = value.trim().parse().ok()?;
    Utc.timestamp_opt(secs, 0).single().map(Timestamp::from_utc)
}

/// Parse an ISO-8601 / RFC 3339 / RFC 2822 style date-time and convert it to UTC.
/// Values without an offset are taken to be UTC already.
pub fn normalize_iso_datetime(value: &str) -> Option<Timestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(Timestamp::from_utc(dt.with_timezone(&Utc)));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(Timestamp::from_utc(dt.with_timezone(&Utc)));
    }

    // A trailing Z is UTC; spell it as an offset so the zoned layouts apply
    let zoned = match value.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&zoned, fmt).ok())
    {
        return Some(Timestamp::from_utc(dt.with_timezone(&Utc)));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(Timestamp::from_utc(naive.and_utc()));
    }

    // Date only: midnight UTC
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp::from_utc(naive.and_utc()))
}
