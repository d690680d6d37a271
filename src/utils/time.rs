use chrono::{DateTime, Utc};

/// Fractional hours elapsed between two instants.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

/// Convert a Unix timestamp (seconds) to `DateTime<Utc>`.
pub fn from_unix_timestamp(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Parse an ISO 8601 / RFC 3339 timestamp string.
pub fn parse_iso_timestamp(timestamp_str: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(timestamp_str).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_hours_between() {
        let start = Utc::now();
        let end = start + Duration::minutes(90);
        assert!((hours_between(start, end) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_unix_timestamp() {
        let ts = from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_parse_iso_timestamp() {
        let ts = parse_iso_timestamp("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.timestamp(), 1_705_320_000);
    }
}
