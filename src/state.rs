use std::sync::Arc;

use crate::clock::Clock;
use crate::engine::locks::VehicleLocks;
use crate::observability::metrics::Metrics;
use crate::store::{
    BookingRepository, InMemoryBookingRepository, InMemoryVehicleRepository, VehicleRepository,
};

pub struct AppState {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub clock: Arc<dyn Clock>,
    pub vehicle_locks: VehicleLocks,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            vehicles,
            bookings,
            clock,
            vehicle_locks: VehicleLocks::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(InMemoryVehicleRepository::new()),
            Arc::new(InMemoryBookingRepository::new()),
            clock,
        )
    }
}
