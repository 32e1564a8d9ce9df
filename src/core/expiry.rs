use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Date formats accepted for `valid_until`, tried in order. Slash and dash
/// numeric dates are read month-first, matching the upstream data feed.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Lenient parse of a calendar date from common formats. Returns None when
/// nothing matches.
pub fn parse_date_lenient(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // Timestamps are tolerated, only the date part matters.
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}

/// Pure expiry-window check used by [`is_expiring_soon`] and the tests.
///
/// The threshold is a literal `threshold_months * 30` days, never
/// calendar-month arithmetic; downstream consumers depend on the exact
/// boundary. True iff the date has not already passed and falls no later
/// than the threshold.
pub fn is_expiring_within(expiry_date_str: &str, threshold_months: u32, today: NaiveDate) -> bool {
    let Some(expiry_date) = parse_date_lenient(expiry_date_str) else {
        tracing::warn!("Error parsing date '{}': unrecognized format", expiry_date_str);
        return false;
    };

    let threshold_date = today + Duration::days(i64::from(threshold_months) * 30);
    today <= expiry_date && expiry_date <= threshold_date
}

/// Check if an accreditation expires within the threshold period from today.
pub fn is_expiring_soon(expiry_date_str: &str, threshold_months: u32) -> bool {
    is_expiring_within(expiry_date_str, threshold_months, Local::now().date_naive())
}
