//! Timestamp value generators.
//!
//! The default window is fixed so generated dates never depend on the clock.

use chrono::{DateTime, NaiveDate, Utc};
use mock_core::Value;
use rand::Rng;

/// Start of the default datetime window (2000-01-01T00:00:00Z).
const DEFAULT_START_TS: i64 = 946_684_800;
/// End of the default datetime window (2030-01-01T00:00:00Z).
const DEFAULT_END_TS: i64 = 1_893_456_000;

/// Pick a random instant in `[start_ts, end_ts]`.
fn random_datetime<R: Rng>(rng: &mut R, start_ts: i64, end_ts: i64) -> Option<DateTime<Utc>> {
    if start_ts >= end_ts {
        return DateTime::from_timestamp(start_ts, 0);
    }
    DateTime::from_timestamp(rng.gen_range(start_ts..=end_ts), 0)
}

/// Generate an RFC 3339 datetime string.
pub fn generate_datetime<R: Rng>(rng: &mut R) -> Value {
    random_datetime(rng, DEFAULT_START_TS, DEFAULT_END_TS)
        .map(|dt| Value::String(dt.to_rfc3339()))
        .unwrap_or(Value::Null)
}

/// Generate a `YYYY-MM-DD` date string.
pub fn generate_date<R: Rng>(rng: &mut R) -> Value {
    random_datetime(rng, DEFAULT_START_TS, DEFAULT_END_TS)
        .map(|dt| Value::String(dt.format("%Y-%m-%d").to_string()))
        .unwrap_or(Value::Null)
}

/// Generate a random RFC 3339 timestamp in the given range.
///
/// The start and end should be ISO 8601 formatted timestamps or dates.
pub fn generate_timestamp_range<R: Rng>(rng: &mut R, start: &str, end: &str) -> Value {
    let start_dt = parse_timestamp(start);
    let end_dt = parse_timestamp(end);

    let dt = match (start_dt, end_dt) {
        (Some(start), Some(end)) => {
            random_datetime(rng, start.timestamp(), end.timestamp()).unwrap_or(start)
        }
        (Some(dt), None) | (None, Some(dt)) => dt,
        (None, None) => return generate_datetime(rng),
    };

    Value::String(dt.to_rfc3339())
}

/// Parse a timestamp string in various formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_datetime() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_datetime(&mut rng);

        let dt = parse_timestamp(value.as_str().unwrap()).unwrap();
        assert!(dt.year() >= 2000 && dt.year() <= 2030);
    }

    #[test]
    fn test_generate_date() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_date(&mut rng);
        let s = value.as_str().unwrap();

        assert_eq!(s.len(), 10);
        assert!(NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_generate_timestamp_range() {
        let mut rng = StdRng::seed_from_u64(42);

        let value =
            generate_timestamp_range(&mut rng, "2020-01-01T00:00:00Z", "2024-12-31T23:59:59Z");
        let dt = parse_timestamp(value.as_str().unwrap()).unwrap();
        assert!(dt.year() >= 2020 && dt.year() <= 2024);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15T10:30:00Z").is_some());
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("invalid").is_none());
    }
}
