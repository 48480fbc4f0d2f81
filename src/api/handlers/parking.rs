use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::payload::ApiJson;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::BookParkingRequest, responses::ParkingReleaseResponse};
use crate::domain::models::reservation::Releaser;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.parking_repo.list().await?))
}

pub async fn list_available(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.parking_repo.list_available().await?))
}

pub async fn list_mine(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.parking_repo.list_by_holder(&principal.id).await?))
}

pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookParkingRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let slot = state.reservations
        .book_slot(&id, &principal.id, payload.event_id.trim().to_string(), payload.vehicle_number.trim().to_string())
        .await?;

    Ok(Json(slot))
}

/// Owners release their own booking; a host token releases any booking.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let releaser = if principal.is_host {
        Releaser::Host
    } else {
        Releaser::Claimant(principal.id)
    };

    let slot = state.reservations.release_slot(&id, releaser).await?;

    Ok(Json(ParkingReleaseResponse {
        message: format!("Booking for slot {} cancelled", slot.slot_number),
        slot,
    }))
}
