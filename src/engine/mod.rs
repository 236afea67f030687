pub mod availability;
pub mod bookings;
pub mod duration;
pub mod fleet;
pub mod locks;
pub mod overlap;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::AppError;

/// IST (UTC+05:30). Zone-less timestamps and the peak band are read in it.
pub(crate) const LOCAL_OFFSET_SECONDS: i32 = 5 * 3_600 + 30 * 60;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parses an RFC 3339 timestamp. Zone-less `datetime-local` values such as
/// `2025-07-20T10:00` are read as IST.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let local = FixedOffset::east_opt(LOCAL_OFFSET_SECONDS)
        .ok_or_else(|| AppError::Internal("invalid local offset".to_string()))?;

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| naive.and_local_timezone(local).single())
        .map(|instant| instant.with_timezone(&Utc))
        .ok_or_else(|| AppError::BadRequest("Invalid startTime format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_start_time;
    use crate::error::AppError;

    #[test]
    fn offset_timestamps_are_normalised_to_utc() {
        let parsed = parse_start_time("2025-07-20T10:00:00+05:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-07-20T04:30:00+00:00");
    }

    #[test]
    fn zone_less_timestamps_are_read_as_ist() {
        let parsed = parse_start_time("2025-07-20T10:00").unwrap();
        assert_eq!(parsed, parse_start_time("2025-07-20T10:00:00+05:30").unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            parse_start_time("next tuesday"),
            Err(AppError::BadRequest(msg)) if msg == "Invalid startTime format"
        ));
    }
}
