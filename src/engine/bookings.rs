use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::duration::{estimate_duration_hours, ride_window};
use crate::engine::locks::acquire;
use crate::engine::overlap::has_conflict;
use crate::engine::parse_start_time;
use crate::error::AppError;
use crate::models::booking::{Booking, BookingStatus, BookingWithVehicle, TimeWindow};
use crate::models::vehicle::VehicleSummary;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub vehicle_id: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
    pub customer_id: String,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Guarded {
    Edit,
    Cancel,
    Delete,
}

impl Guarded {
    fn verb(self) -> &'static str {
        match self {
            Guarded::Edit => "edit",
            Guarded::Cancel => "cancel",
            Guarded::Delete => "delete",
        }
    }
}

pub fn create_booking(state: &AppState, request: NewBooking) -> Result<Booking, AppError> {
    let result = try_create_booking(state, request);
    state.metrics.observe_booking("create", &result);
    result
}

fn try_create_booking(state: &AppState, request: NewBooking) -> Result<Booking, AppError> {
    let vehicle_id = Uuid::parse_str(request.vehicle_id.trim()).map_err(|_| vehicle_not_found())?;
    state
        .vehicles
        .find_by_id(&vehicle_id)?
        .ok_or_else(vehicle_not_found)?;

    let start = parse_start_time(&request.start_time)?;
    let hours = estimate_duration_hours(&request.from_pincode, &request.to_pincode, start)?;
    let window = ride_window(start, hours)?;

    info!(
        vehicle_id = %vehicle_id,
        from_pincode = %request.from_pincode,
        to_pincode = %request.to_pincode,
        start = %window.start,
        duration_hours = hours,
        "attempting booking"
    );

    let lock = state.vehicle_locks.for_vehicle(vehicle_id);
    let _guard = acquire(&lock)?;

    ensure_vehicle_free(state, vehicle_id, &window, None)?;

    let now = state.clock.now();
    let booking = Booking {
        id: Uuid::new_v4(),
        vehicle_id,
        from_pincode: request.from_pincode.trim().to_string(),
        to_pincode: request.to_pincode.trim().to_string(),
        start_time: window.start,
        end_time: window.end,
        customer_id: request.customer_id.trim().to_string(),
        status: BookingStatus::Active,
        created_at: now,
        updated_at: now,
    };

    let saved = state.bookings.insert(booking)?;
    info!(booking_id = %saved.id, vehicle_id = %vehicle_id, "booking created");

    Ok(saved)
}

pub fn list_bookings(state: &AppState) -> Result<Vec<BookingWithVehicle>, AppError> {
    let bookings = state.bookings.find(&|_| true)?;

    bookings
        .into_iter()
        .map(|booking| -> Result<BookingWithVehicle, AppError> {
            let vehicle = state
                .vehicles
                .find_by_id(&booking.vehicle_id)?
                .as_ref()
                .map(VehicleSummary::from);
            Ok(BookingWithVehicle { booking, vehicle })
        })
        .collect()
}

pub fn update_booking(
    state: &AppState,
    id: Uuid,
    changes: BookingChanges,
) -> Result<Booking, AppError> {
    let result = try_update_booking(state, id, changes);
    state.metrics.observe_booking("update", &result);
    result
}

fn try_update_booking(
    state: &AppState,
    id: Uuid,
    changes: BookingChanges,
) -> Result<Booking, AppError> {
    let vehicle_id = load_mutable(state, id, Guarded::Edit)?.vehicle_id;

    let lock = state.vehicle_locks.for_vehicle(vehicle_id);
    let _guard = acquire(&lock)?;

    // Everything below works from the locked read; a concurrent change may
    // have landed since the lookup above.
    let current = load_mutable(state, id, Guarded::Edit)?;

    let start = match changes.start_time.as_deref() {
        Some(raw) => parse_start_time(raw)?,
        None => current.start_time,
    };
    let from_pincode = changes
        .from_pincode
        .map(|p| p.trim().to_string())
        .unwrap_or_else(|| current.from_pincode.clone());
    let to_pincode = changes
        .to_pincode
        .map(|p| p.trim().to_string())
        .unwrap_or_else(|| current.to_pincode.clone());
    let customer_id = changes
        .customer_id
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| current.customer_id.clone());

    let hours = estimate_duration_hours(&from_pincode, &to_pincode, start)?;
    let window = ride_window(start, hours)?;

    ensure_vehicle_free(state, current.vehicle_id, &window, Some(id))?;

    let updated = Booking {
        from_pincode,
        to_pincode,
        start_time: window.start,
        end_time: window.end,
        customer_id,
        updated_at: state.clock.now(),
        ..current
    };

    let saved = state
        .bookings
        .update(updated)?
        .ok_or_else(booking_not_found)?;

    info!(
        booking_id = %id,
        start = %saved.start_time,
        end = %saved.end_time,
        "booking updated"
    );

    Ok(saved)
}

pub fn cancel_booking(state: &AppState, id: Uuid) -> Result<Booking, AppError> {
    let result = try_cancel_booking(state, id);
    state.metrics.observe_booking("cancel", &result);
    result
}

fn try_cancel_booking(state: &AppState, id: Uuid) -> Result<Booking, AppError> {
    let current = load_mutable(state, id, Guarded::Cancel)?;

    let lock = state.vehicle_locks.for_vehicle(current.vehicle_id);
    let _guard = acquire(&lock)?;
    let current = load_mutable(state, id, Guarded::Cancel)?;

    let cancelled = Booking {
        status: BookingStatus::Cancelled,
        updated_at: state.clock.now(),
        ..current
    };

    let saved = state
        .bookings
        .update(cancelled)?
        .ok_or_else(booking_not_found)?;

    info!(booking_id = %id, "booking cancelled");
    Ok(saved)
}

pub fn delete_booking(state: &AppState, id: Uuid) -> Result<(), AppError> {
    let result = try_delete_booking(state, id);
    state.metrics.observe_booking("delete", &result);
    result
}

fn try_delete_booking(state: &AppState, id: Uuid) -> Result<(), AppError> {
    let current = load_mutable(state, id, Guarded::Delete)?;

    let lock = state.vehicle_locks.for_vehicle(current.vehicle_id);
    let _guard = acquire(&lock)?;
    load_mutable(state, id, Guarded::Delete)?;

    if !state.bookings.delete(&id)? {
        return Err(booking_not_found());
    }

    info!(booking_id = %id, "booking deleted");
    Ok(())
}

/// Loads a booking that may still be changed: it exists, is active, and its
/// stored start time is still ahead of the clock.
fn load_mutable(state: &AppState, id: Uuid, action: Guarded) -> Result<Booking, AppError> {
    let booking = state
        .bookings
        .find_by_id(&id)?
        .filter(Booking::is_active)
        .ok_or_else(booking_not_found)?;

    let now = state.clock.now();
    if booking.start_time <= now {
        warn!(
            booking_id = %id,
            start = %booking.start_time,
            now = %now,
            "refusing to {} a booking that has started",
            action.verb()
        );
        return Err(AppError::InvalidState(format!(
            "Cannot {} past or current bookings",
            action.verb()
        )));
    }

    Ok(booking)
}

fn ensure_vehicle_free(
    state: &AppState,
    vehicle_id: Uuid,
    window: &TimeWindow,
    exclude: Option<Uuid>,
) -> Result<(), AppError> {
    if has_conflict(state.bookings.as_ref(), vehicle_id, window, exclude)? {
        state.metrics.booking_conflicts_total.inc();
        return Err(AppError::Conflict(
            "Vehicle is already booked for this time slot".to_string(),
        ));
    }
    Ok(())
}

fn vehicle_not_found() -> AppError {
    AppError::NotFound("Vehicle not found".to_string())
}

fn booking_not_found() -> AppError {
    AppError::NotFound("Booking not found or already cancelled".to_string())
}
