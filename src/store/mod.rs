//! Narrow repository interfaces the booking engine is written against.
//!
//! Records come back from `find` in insertion order, which is the order the
//! availability search reports vehicles in.

pub mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;

pub use memory::{InMemoryBookingRepository, InMemoryVehicleRepository};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate record {0}")]
    Duplicate(Uuid),
}

pub trait VehicleRepository: Send + Sync {
    fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, StoreError>;

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Vehicle>, StoreError>;

    fn find(&self, predicate: &dyn Fn(&Vehicle) -> bool) -> Result<Vec<Vehicle>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

pub trait BookingRepository: Send + Sync {
    fn insert(&self, booking: Booking) -> Result<Booking, StoreError>;

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Booking>, StoreError>;

    fn find(&self, predicate: &dyn Fn(&Booking) -> bool) -> Result<Vec<Booking>, StoreError>;

    /// Replaces the stored record with the same id. Returns `None` when no
    /// such record exists.
    fn update(&self, booking: Booking) -> Result<Option<Booking>, StoreError>;

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}
