use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct VehicleSpec {
    pub name: String,
    pub capacity_kg: u32,
    pub tyres: u32,
}

pub fn register_vehicle(state: &AppState, spec: VehicleSpec) -> Result<Vehicle, AppError> {
    let name = spec.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if spec.capacity_kg == 0 {
        return Err(AppError::BadRequest("capacityKg must be > 0".to_string()));
    }

    if spec.tyres == 0 {
        return Err(AppError::BadRequest("tyres must be > 0".to_string()));
    }

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        name: name.to_string(),
        capacity_kg: spec.capacity_kg,
        tyres: spec.tyres,
        created_at: state.clock.now(),
    };

    let saved = state.vehicles.insert(vehicle)?;
    state.metrics.vehicles_registered.inc();

    info!(
        vehicle_id = %saved.id,
        name = %saved.name,
        capacity_kg = saved.capacity_kg,
        "vehicle registered"
    );

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{VehicleSpec, register_vehicle};
    use crate::clock::SystemClock;
    use crate::error::AppError;
    use crate::state::AppState;

    fn spec(name: &str, capacity_kg: u32, tyres: u32) -> VehicleSpec {
        VehicleSpec {
            name: name.to_string(),
            capacity_kg,
            tyres,
        }
    }

    #[test]
    fn registered_vehicle_is_stored() {
        let state = AppState::in_memory(Arc::new(SystemClock));
        let vehicle = register_vehicle(&state, spec("  Truck ", 1000, 4)).unwrap();

        assert_eq!(vehicle.name, "Truck");
        let stored = state.vehicles.find_by_id(&vehicle.id).unwrap().unwrap();
        assert_eq!(stored, vehicle);
    }

    #[test]
    fn invalid_specs_are_rejected() {
        let state = AppState::in_memory(Arc::new(SystemClock));

        for bad in [spec(" ", 1000, 4), spec("Truck", 0, 4), spec("Truck", 1000, 0)] {
            assert!(matches!(
                register_vehicle(&state, bad),
                Err(AppError::BadRequest(_))
            ));
        }
        assert_eq!(state.vehicles.count().unwrap(), 0);
    }
}
