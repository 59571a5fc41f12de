use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Reduces a stored date or timestamp to its UTC calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and offset-less timestamps
/// (read as UTC). Anything else yields `None`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|dt| dt.date())
}

pub fn parse_optional_calendar_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(parse_calendar_date)
}

/// First Monday strictly after `today`.
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let from_monday = i64::from(today.weekday().num_days_from_monday());
    today + Duration::days(7 - from_monday)
}

pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

pub fn ics_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

pub fn ics_timestamp(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}
