use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle::VehicleSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
}

/// Closed interval `[start, end]` during which a vehicle is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(end > start, "window must end after it starts");
        Self { start, end }
    }

    /// Touching endpoints count as overlapping.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub customer_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithVehicle {
    #[serde(flatten)]
    pub booking: Booking,
    pub vehicle: Option<VehicleSummary>,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::TimeWindow;

    fn window(start_hour: u32, end_hour: u32) -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 7, 20, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 7, 20, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn touching_windows_overlap() {
        assert!(window(10, 12).overlaps(&window(12, 14)));
        assert!(window(12, 14).overlaps(&window(10, 12)));
    }

    #[test]
    fn contained_window_overlaps() {
        assert!(window(8, 16).overlaps(&window(10, 12)));
        assert!(window(10, 12).overlaps(&window(8, 16)));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!window(10, 12).overlaps(&window(13, 14)));
        assert!(!window(13, 14).overlaps(&window(10, 12)));
    }
}
