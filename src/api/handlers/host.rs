use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::payload::ApiJson;
use crate::api::extractors::auth::HostUser;
use crate::api::dtos::{
    requests::{CreateFoodItemRequest, CreateParkingSlotRequest, UpdateOrderStatusRequest},
    responses::ParkingReleaseResponse,
};
use crate::domain::models::{
    food::FoodItem,
    parking::ParkingSlot,
    reservation::Releaser,
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

// Food menu

pub async fn list_all_items(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.food_repo.list_items(false, None).await?))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    HostUser(host): HostUser,
    ApiJson(payload): ApiJson<CreateFoodItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = FoodItem::new(
        payload.name.trim().to_string(),
        payload.description,
        payload.price,
        payload.category,
        payload.is_available.unwrap_or(true),
        payload.image,
    );
    let created = state.food_repo.create_item(&item).await?;

    info!(item_id = %created.id, host = %host.id, "Food item created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.food_repo.delete_item(&id).await? {
        return Err(AppError::NotFound("Food item not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_item(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.food_repo.find_item(&id).await?
        .ok_or(AppError::NotFound("Food item not found".into()))?;

    let updated = state.food_repo.set_availability(&id, !item.is_available).await?
        .ok_or(AppError::NotFound("Food item not found".into()))?;

    Ok(Json(updated))
}

// Food orders

pub async fn list_all_orders(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.food_repo.list_orders().await?))
}

pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.food_repo.update_order_status(&id, payload.status.as_str()).await?
        .ok_or(AppError::NotFound("Order not found".into()))?;

    info!(order_id = %id, status = %order.status, "Order status updated");
    Ok(Json(order))
}

// Parking inventory

pub async fn list_all_slots(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.parking_repo.list_by_area().await?))
}

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    ApiJson(payload): ApiJson<CreateParkingSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let slot_number = payload.slot_number.trim().to_string();

    if state.parking_repo.find_by_slot_number(&slot_number).await?.is_some() {
        return Err(AppError::Conflict(format!("Slot {} already exists", slot_number)));
    }

    let slot = ParkingSlot::new(slot_number, payload.area.trim().to_string(), payload.vehicle_type);
    let created = state.parking_repo.create(&slot).await?;

    info!(slot_id = %created.id, slot_number = %created.slot_number, "Parking slot created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.parking_repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::NotFound("Parking slot not found".into()));
    }

    if !state.parking_repo.delete_unbooked(&id).await? {
        return Err(AppError::Validation("Cannot delete a booked parking slot".into()));
    }

    info!(slot_id = %id, "Parking slot deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.parking_repo.list_booked().await?))
}

pub async fn release_booking(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state.reservations.release_slot(&id, Releaser::Host).await?;

    Ok(Json(ParkingReleaseResponse {
        message: format!("Booking for slot {} released", slot.slot_number),
        slot,
    }))
}

// Event registrations

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    _host: HostUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.event_repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::NotFound("Event not found".into()));
    }
    Ok(Json(state.event_repo.list_registrations(&id).await?))
}
