use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{BookingRepository, StoreError, VehicleRepository};
use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;

struct Sequenced<T> {
    seq: u64,
    record: T,
}

struct Table<T> {
    rows: DashMap<Uuid, Sequenced<T>>,
    next_seq: AtomicU64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    fn insert(&self, id: Uuid, record: T) -> Result<T, StoreError> {
        match self.rows.entry(id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(id)),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Sequenced {
                    seq,
                    record: record.clone(),
                });
                Ok(record)
            }
        }
    }

    fn get(&self, id: &Uuid) -> Option<T> {
        self.rows.get(id).map(|row| row.record.clone())
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        let mut matched: Vec<(u64, T)> = self
            .rows
            .iter()
            .filter(|row| predicate(&row.record))
            .map(|row| (row.seq, row.record.clone()))
            .collect();

        matched.sort_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, record)| record).collect()
    }

    fn replace(&self, id: &Uuid, record: T) -> Option<T> {
        let mut row = self.rows.get_mut(id)?;
        row.record = record.clone();
        Some(record)
    }

    fn remove(&self, id: &Uuid) -> bool {
        self.rows.remove(id).is_some()
    }
}

pub struct InMemoryVehicleRepository {
    table: Table<Vehicle>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryVehicleRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VehicleRepository for InMemoryVehicleRepository {
    fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, StoreError> {
        self.table.insert(vehicle.id, vehicle)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.table.get(id))
    }

    fn find(&self, predicate: &dyn Fn(&Vehicle) -> bool) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.table.find(predicate))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.table.rows.len())
    }
}

pub struct InMemoryBookingRepository {
    table: Table<Booking>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, booking: Booking) -> Result<Booking, StoreError> {
        self.table.insert(booking.id, booking)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.table.get(id))
    }

    fn find(&self, predicate: &dyn Fn(&Booking) -> bool) -> Result<Vec<Booking>, StoreError> {
        Ok(self.table.find(predicate))
    }

    fn update(&self, booking: Booking) -> Result<Option<Booking>, StoreError> {
        let id = booking.id;
        Ok(self.table.replace(&id, booking))
    }

    fn delete(&self, id: &Uuid) -> Result<bool, StoreError> {
        Ok(self.table.remove(id))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.table.rows.len())
    }
}
