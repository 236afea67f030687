use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{missing_fields, non_blank};
use crate::engine::bookings::{
    BookingChanges, NewBooking, cancel_booking, create_booking, delete_booking, list_bookings,
    update_booking,
};
use crate::error::AppError;
use crate::models::booking::{Booking, BookingWithVehicle};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create).get(list))
        .route("/bookings/:id", put(update).delete(remove))
        .route("/bookings/:id/cancel", put(cancel))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub vehicle_id: Option<String>,
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
}

async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let Json(payload) = payload?;

    let (Some(vehicle_id), Some(from_pincode), Some(to_pincode), Some(start_time), Some(customer_id)) = (
        non_blank(payload.vehicle_id),
        non_blank(payload.from_pincode),
        non_blank(payload.to_pincode),
        non_blank(payload.start_time),
        non_blank(payload.customer_id),
    ) else {
        return Err(missing_fields());
    };

    let booking = create_booking(
        &state,
        NewBooking {
            vehicle_id,
            from_pincode,
            to_pincode,
            start_time,
            customer_id,
        },
    )?;

    Ok((StatusCode::CREATED, Json(booking)))
}

async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<BookingWithVehicle>>, AppError> {
    Ok(Json(list_bookings(&state)?))
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    let Json(payload) = payload?;
    let id = booking_id(&id)?;

    let booking = update_booking(
        &state,
        id,
        BookingChanges {
            from_pincode: non_blank(payload.from_pincode),
            to_pincode: non_blank(payload.to_pincode),
            start_time: non_blank(payload.start_time),
            customer_id: non_blank(payload.customer_id),
        },
    )?;

    Ok(Json(booking))
}

async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = cancel_booking(&state, booking_id(&id)?)?;
    Ok(Json(booking))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    delete_booking(&state, booking_id(&id)?)?;
    Ok(Json(DeletedResponse {
        message: "Booking deleted successfully",
    }))
}

fn booking_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound("Booking not found or already cancelled".to_string()))
}
