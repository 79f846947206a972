//! Construction boundary for instants.
//!
//! Every instant is a UTC `DateTime`; once built it is always valid, so the
//! "invalid instant" failure can only happen here or when arithmetic leaves
//! the representable range.

use crate::core::error::{Result, TimespanError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};

pub type Instant = DateTime<Utc>;

pub fn now() -> Instant {
    truncate(Utc::now())
}

/// Drops precision below one millisecond, the smallest unit tracked.
pub fn truncate(instant: Instant) -> Instant {
    instant.trunc_subsecs(3)
}

pub fn from_millis(millis: i64) -> Result<Instant> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| TimespanError::instant(format!("{millis}ms is out of range")))
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse(input: &str) -> Result<Instant> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimespanError::instant("empty date"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(truncate(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(truncate(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(TimespanError::instant(format!("{input:?} is not a date")))
}

pub fn millis(instant: &Instant) -> i64 {
    instant.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{from_millis, millis, parse};
    use crate::core::error::TimespanError;

    #[test]
    fn parses_rfc3339_naive_and_bare_dates() {
        let zulu = parse("2023-11-01T00:00:00Z").expect("rfc3339");
        let naive = parse("2023-11-01T00:00:00").expect("naive");
        let bare = parse("2023-11-01").expect("bare");
        assert_eq!(zulu, naive);
        assert_eq!(naive, bare);

        let offset = parse("2023-11-01T02:00:00+02:00").expect("offset");
        assert_eq!(offset, zulu);

        let fraction = parse("2023-11-01T00:00:00.250999").expect("fraction");
        assert_eq!(millis(&fraction) - millis(&zulu), 250);
        assert_eq!(fraction.timestamp_subsec_nanos(), 250_000_000);
    }

    #[test]
    fn garbage_is_an_invalid_instant() {
        for input in ["", "   ", "yesterday", "2023-13-01", "2023-02-30T00:00:00"] {
            let err = parse(input).expect_err("should fail");
            assert!(matches!(err, TimespanError::InvalidInstant { .. }), "{input}");
        }
    }

    #[test]
    fn millis_round_trip_and_range() {
        let instant = from_millis(1_700_000_000_123).expect("in range");
        assert_eq!(millis(&instant), 1_700_000_000_123);
        assert!(from_millis(i64::MAX).is_err());
    }
}
