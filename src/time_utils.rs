// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as an RFC3339 string.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Normalize a timestamp to its calendar day (`YYYY-MM-DD`).
pub fn day_key(date: DateTime<Utc>) -> String {
    date.date_naive().format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` or RFC3339 date string down to its calendar day.
pub fn parse_day_key(raw: &str) -> Option<String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| day_key(dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key_truncates_time() {
        let dt = DateTime::parse_from_rfc3339("2024-03-05T18:45:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(day_key(dt), "2024-03-05");
    }

    #[test]
    fn test_parse_day_key_accepts_both_formats() {
        assert_eq!(parse_day_key("2024-03-05"), Some("2024-03-05".to_string()));
        assert_eq!(
            parse_day_key("2024-03-05T18:45:00Z"),
            Some("2024-03-05".to_string())
        );
        assert_eq!(parse_day_key("not-a-date"), None);
    }
}
