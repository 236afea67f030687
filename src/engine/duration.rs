use chrono::{DateTime, Duration, Timelike, Utc};

use super::LOCAL_OFFSET_SECONDS;
use crate::error::AppError;
use crate::models::booking::TimeWindow;

/// Pincode difference that counts as one kilometre.
const PINCODE_UNITS_PER_KM: f64 = 1_000.0;
const AVERAGE_SPEED_KMH: f64 = 50.0;

const PEAK_MULTIPLIER: f64 = 1.2;
const PEAK_START_HOUR: f64 = 9.0;
const PEAK_END_HOUR: f64 = 18.0;

const MIN_DURATION_HOURS: u32 = 1;

pub fn parse_pincode(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("invalid pincode: {raw}")))
}

pub fn estimate_duration_hours(
    from_pincode: &str,
    to_pincode: &str,
    departure: DateTime<Utc>,
) -> Result<u32, AppError> {
    let from = parse_pincode(from_pincode)?;
    let to = parse_pincode(to_pincode)?;

    let distance_km = from.abs_diff(to) as f64 / PINCODE_UNITS_PER_KM;
    let mut hours = distance_km / AVERAGE_SPEED_KMH;

    if is_peak(departure) {
        hours *= PEAK_MULTIPLIER;
    }

    Ok((hours.round() as u32).max(MIN_DURATION_HOURS))
}

pub fn is_peak(at: DateTime<Utc>) -> bool {
    let local = at.naive_utc() + Duration::seconds(i64::from(LOCAL_OFFSET_SECONDS));
    let hour = local.hour() as f64 + local.minute() as f64 / 60.0;
    (PEAK_START_HOUR..=PEAK_END_HOUR).contains(&hour)
}

pub fn ride_window(start: DateTime<Utc>, duration_hours: u32) -> Result<TimeWindow, AppError> {
    let end = start
        .checked_add_signed(Duration::hours(i64::from(duration_hours)))
        .ok_or_else(|| AppError::BadRequest("startTime is out of range".to_string()))?;

    Ok(TimeWindow::new(start, end))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::{estimate_duration_hours, is_peak, ride_window};
    use crate::error::AppError;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn identical_pincodes_take_one_hour() {
        for time in [
            "2025-07-20T03:00:00+05:30",
            "2025-07-20T10:00:00+05:30",
            "2025-07-20T23:30:00+05:30",
        ] {
            assert_eq!(estimate_duration_hours("560001", "560001", at(time)).unwrap(), 1);
        }
    }

    #[test]
    fn off_peak_uses_base_speed() {
        // 530865 units -> 530.865 km -> 10.6 h
        let hours = estimate_duration_hours("123456", "654321", at("2025-07-20T06:00:00+05:30"));
        assert_eq!(hours.unwrap(), 11);
    }

    #[test]
    fn peak_departure_is_inflated() {
        // 10.6 h * 1.2 = 12.7 h
        let hours = estimate_duration_hours("123456", "654321", at("2025-07-20T10:00:00+05:30"));
        assert_eq!(hours.unwrap(), 13);
    }

    #[test]
    fn direction_does_not_matter() {
        let departure = at("2025-07-20T20:00:00+05:30");
        assert_eq!(
            estimate_duration_hours("654321", "123456", departure).unwrap(),
            estimate_duration_hours("123456", "654321", departure).unwrap()
        );
    }

    #[test]
    fn peak_band_is_inclusive_in_ist() {
        assert!(is_peak(at("2025-07-20T09:00:00+05:30")));
        assert!(is_peak(at("2025-07-20T18:00:00+05:30")));
        assert!(!is_peak(at("2025-07-20T18:01:00+05:30")));
        assert!(!is_peak(at("2025-07-20T08:59:00+05:30")));
        // 04:00 UTC is 09:30 IST
        assert!(is_peak(at("2025-07-20T04:00:00Z")));
    }

    #[test]
    fn non_numeric_pincode_is_rejected() {
        let err = estimate_duration_hours("abc", "560001", at("2025-07-20T10:00:00+05:30"));
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn window_ends_after_duration() {
        let start = at("2025-07-20T10:00:00+05:30");
        let window = ride_window(start, 2).unwrap();
        assert_eq!(window.end, at("2025-07-20T12:00:00+05:30"));
    }
}
