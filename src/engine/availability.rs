use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::engine::duration::{estimate_duration_hours, ride_window};
use crate::engine::overlap::has_conflict;
use crate::engine::parse_start_time;
use crate::error::AppError;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AvailabilityQuery {
    pub capacity_required: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicles {
    pub vehicles: Vec<Vehicle>,
    pub estimated_ride_duration_hours: u32,
}

/// Vehicles with enough capacity and no active booking overlapping the ride,
/// in inventory order.
pub fn find_available(
    state: &AppState,
    query: AvailabilityQuery,
) -> Result<AvailableVehicles, AppError> {
    let started = Instant::now();
    let result = try_find_available(state, query);

    state
        .metrics
        .availability_search_latency_seconds
        .observe(started.elapsed().as_secs_f64());

    result
}

fn try_find_available(
    state: &AppState,
    query: AvailabilityQuery,
) -> Result<AvailableVehicles, AppError> {
    let start = parse_start_time(&query.start_time)?;
    let capacity = parse_capacity(&query.capacity_required)?;

    let hours = estimate_duration_hours(&query.from_pincode, &query.to_pincode, start)?;
    let window = ride_window(start, hours)?;

    let candidates = state.vehicles.find(&|vehicle| vehicle.capacity_kg >= capacity)?;
    let candidate_count = candidates.len();

    let mut vehicles = Vec::with_capacity(candidate_count);
    for vehicle in candidates {
        if !has_conflict(state.bookings.as_ref(), vehicle.id, &window, None)? {
            vehicles.push(vehicle);
        }
    }

    info!(
        capacity_required = capacity,
        start = %window.start,
        duration_hours = hours,
        candidates = candidate_count,
        available = vehicles.len(),
        "availability search"
    );

    Ok(AvailableVehicles {
        vehicles,
        estimated_ride_duration_hours: hours,
    })
}

fn parse_capacity(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|capacity| *capacity > 0)
        .ok_or_else(|| AppError::BadRequest("Capacity must be a positive number".to_string()))
}
