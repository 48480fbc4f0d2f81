use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::payload::ApiJson;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateOrderRequest;
use crate::domain::models::food::{FoodCategory, FoodOrder, OrderLine, OrderStatus};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.food_repo.list_items(true, None).await?))
}

pub async fn list_items_by_category(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = FoodCategory::parse(&category)
        .ok_or_else(|| AppError::Validation(format!("Unknown food category '{}'", category)))?;

    Ok(Json(state.food_repo.list_items(true, Some(category.as_str())).await?))
}

/// Prices come from the menu at order time, never from the client.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(event_id) = &payload.event_id
        && state.event_repo.find_by_id(event_id).await?.is_none()
    {
        return Err(AppError::NotFound("Event not found".into()));
    }

    let ids: Vec<String> = payload.items.iter().map(|i| i.item_id.clone()).collect();
    let menu: HashMap<String, _> = state.food_repo.find_items(&ids).await?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    let mut lines = Vec::with_capacity(payload.items.len());
    for requested in &payload.items {
        let item = menu.get(&requested.item_id)
            .ok_or_else(|| AppError::Validation(format!("Unknown food item '{}'", requested.item_id)))?;
        if !item.is_available {
            return Err(AppError::Validation(format!("{} is currently unavailable", item.name)));
        }
        lines.push(OrderLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: requested.quantity,
        });
    }

    let order = FoodOrder::new(principal.id, lines, payload.event_id, payload.delivery_location.trim().to_string());
    let created = state.food_repo.create_order(&order).await?;

    info!(order_id = %created.id, total = created.total, "Food order placed");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.food_repo.list_orders_by_user(&principal.id).await?))
}

async fn owned_order(state: &AppState, principal: &AuthUser, id: &str) -> Result<FoodOrder, AppError> {
    let order = state.food_repo.find_order(id).await?
        .ok_or(AppError::NotFound("Order not found".into()))?;

    if order.user_id != principal.id {
        return Err(AppError::Unauthorized);
    }
    Ok(order)
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(owned_order(&state, &principal, &id).await?))
}

pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = owned_order(&state, &principal, &id).await?;

    if !OrderStatus::is_cancellable(&order.status) {
        return Err(AppError::Validation(format!("Order is already {}", order.status)));
    }

    // The status can move between the read and the write.
    let cancelled = state.food_repo.cancel_order(&id).await?
        .ok_or_else(|| AppError::Validation("Order can no longer be cancelled".into()))?;

    info!(order_id = %id, "Food order cancelled");

    Ok(Json(cancelled))
}
