use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::booking::{Booking, TimeWindow};
use crate::store::BookingRepository;

/// Cancelled bookings never block a vehicle. `exclude` skips one booking,
/// used when a booking is re-checked against its own vehicle on update.
pub fn conflicting_bookings(
    bookings: &dyn BookingRepository,
    vehicle_id: Uuid,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> Result<Vec<Booking>, AppError> {
    let conflicts = bookings.find(&|booking| {
        booking.vehicle_id == vehicle_id
            && booking.is_active()
            && Some(booking.id) != exclude
            && booking.window().overlaps(window)
    })?;

    if !conflicts.is_empty() {
        debug!(
            vehicle_id = %vehicle_id,
            conflicts = conflicts.len(),
            start = %window.start,
            end = %window.end,
            "conflicting bookings found"
        );
    }

    Ok(conflicts)
}

pub fn has_conflict(
    bookings: &dyn BookingRepository,
    vehicle_id: Uuid,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> Result<bool, AppError> {
    Ok(!conflicting_bookings(bookings, vehicle_id, window, exclude)?.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::has_conflict;
    use crate::models::booking::{Booking, BookingStatus, TimeWindow};
    use crate::store::{BookingRepository, InMemoryBookingRepository};

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow::new(at(start), at(end))
    }

    fn booking(id_seed: u128, vehicle: Uuid, window: TimeWindow, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::from_u128(id_seed),
            vehicle_id: vehicle,
            from_pincode: "123456".to_string(),
            to_pincode: "223456".to_string(),
            start_time: window.start,
            end_time: window.end,
            customer_id: "cust123".to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded(status: BookingStatus) -> (InMemoryBookingRepository, Uuid) {
        let repo = InMemoryBookingRepository::new();
        let vehicle = Uuid::from_u128(100);
        repo.insert(booking(
            1,
            vehicle,
            window("2025-07-20T10:00:00+05:30", "2025-07-20T12:00:00+05:30"),
            status,
        ))
        .unwrap();
        (repo, vehicle)
    }

    #[test]
    fn touching_end_conflicts() {
        let (repo, vehicle) = seeded(BookingStatus::Active);
        let candidate = window("2025-07-20T12:00:00+05:30", "2025-07-20T14:00:00+05:30");
        assert!(has_conflict(&repo, vehicle, &candidate, None).unwrap());
    }

    #[test]
    fn touching_start_conflicts() {
        let (repo, vehicle) = seeded(BookingStatus::Active);
        let candidate = window("2025-07-20T08:00:00+05:30", "2025-07-20T10:00:00+05:30");
        assert!(has_conflict(&repo, vehicle, &candidate, None).unwrap());
    }

    #[test]
    fn later_window_is_free() {
        let (repo, vehicle) = seeded(BookingStatus::Active);
        let candidate = window("2025-07-20T12:01:00+05:30", "2025-07-20T14:00:00+05:30");
        assert!(!has_conflict(&repo, vehicle, &candidate, None).unwrap());
    }

    #[test]
    fn other_vehicle_is_free() {
        let (repo, _vehicle) = seeded(BookingStatus::Active);
        let candidate = window("2025-07-20T11:00:00+05:30", "2025-07-20T13:00:00+05:30");
        assert!(!has_conflict(&repo, Uuid::from_u128(200), &candidate, None).unwrap());
    }

    #[test]
    fn cancelled_bookings_do_not_block() {
        let (repo, vehicle) = seeded(BookingStatus::Cancelled);
        let candidate = window("2025-07-20T11:00:00+05:30", "2025-07-20T13:00:00+05:30");
        assert!(!has_conflict(&repo, vehicle, &candidate, None).unwrap());
    }

    #[test]
    fn excluded_booking_is_ignored() {
        let (repo, vehicle) = seeded(BookingStatus::Active);
        let candidate = window("2025-07-20T11:00:00+05:30", "2025-07-20T13:00:00+05:30");
        assert!(!has_conflict(&repo, vehicle, &candidate, Some(Uuid::from_u128(1))).unwrap());
    }
}
