use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde::Deserialize;

use super::{missing_fields, non_blank};
use crate::engine::availability::{AvailabilityQuery, AvailableVehicles, find_available};
use crate::engine::fleet::{VehicleSpec, register_vehicle};
use crate::error::AppError;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vehicles", post(create_vehicle))
        .route("/vehicles/available", get(available_vehicles))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub name: Option<String>,
    pub capacity_kg: Option<i64>,
    pub tyres: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub capacity_required: Option<String>,
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let Json(payload) = payload?;

    let (Some(name), Some(capacity_kg), Some(tyres)) =
        (non_blank(payload.name), payload.capacity_kg, payload.tyres)
    else {
        return Err(missing_fields());
    };

    let vehicle = register_vehicle(
        &state,
        VehicleSpec {
            name,
            capacity_kg: positive("capacityKg", capacity_kg)?,
            tyres: positive("tyres", tyres)?,
        },
    )?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn available_vehicles(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Result<Json<AvailableVehicles>, AppError> {
    let Query(params) = params?;

    let (Some(capacity_required), Some(from_pincode), Some(to_pincode), Some(start_time)) = (
        non_blank(params.capacity_required),
        non_blank(params.from_pincode),
        non_blank(params.to_pincode),
        non_blank(params.start_time),
    ) else {
        return Err(AppError::BadRequest(
            "Missing required query parameters".to_string(),
        ));
    };

    let result = find_available(
        &state,
        AvailabilityQuery {
            capacity_required,
            from_pincode,
            to_pincode,
            start_time,
        },
    )?;

    Ok(Json(result))
}

fn positive(field: &str, value: i64) -> Result<u32, AppError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::BadRequest(format!("{field} must be a positive integer")))
}
