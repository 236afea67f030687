use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;

/// One mutex per vehicle, serialising the overlap check and the write that
/// follows it.
#[derive(Default)]
pub struct VehicleLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_vehicle(&self, vehicle_id: Uuid) -> Arc<Mutex<()>> {
        self.locks.entry(vehicle_id).or_default().clone()
    }
}

pub fn acquire(lock: &Mutex<()>) -> Result<MutexGuard<'_, ()>, AppError> {
    lock.lock()
        .map_err(|_| AppError::Internal("vehicle lock poisoned".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::VehicleLocks;

    #[test]
    fn same_vehicle_shares_a_lock() {
        let locks = VehicleLocks::new();
        let a = locks.for_vehicle(Uuid::from_u128(1));
        let b = locks.for_vehicle(Uuid::from_u128(1));
        let other = locks.for_vehicle(Uuid::from_u128(2));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &other));
    }
}
