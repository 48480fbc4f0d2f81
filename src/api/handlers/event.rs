use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::payload::{ApiJson, ApiQuery};
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{
    requests::{CreateEventRequest, EventQuery},
    responses::RegistrationResponse,
};
use crate::domain::models::event::{Event, EventCategory, EventFilter, NewEventParams};
use crate::error::AppError;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    ApiJson(payload): ApiJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    info!("Creating event: {} by {}", payload.title, principal.id);

    let event = Event::new(NewEventParams {
        title: payload.title.trim().to_string(),
        description: payload.description,
        category: payload.category,
        subcategory: payload.subcategory,
        date: payload.date,
        time: payload.time,
        location: payload.location,
        price: payload.price,
        capacity: payload.capacity,
        host_id: principal.id,
        skills: payload.skills,
    });

    let created = state.event_repo.create(&event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
    ApiQuery(query): ApiQuery<EventQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = EventFilter {
        category: query.category,
        from: query.from,
        to: query.to,
        host_id: None,
    };
    let events = state.event_repo.list(&filter).await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category = EventCategory::parse(&category)
        .ok_or_else(|| AppError::Validation(format!("Unknown category '{}'", category)))?;

    let filter = EventFilter { category: Some(category), ..Default::default() };
    Ok(Json(state.event_repo.list(&filter).await?))
}

pub async fn list_by_date(
    State(state): State<Arc<AppState>>,
    _principal: AuthUser,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be YYYY-MM-DD".into()))?;

    let filter = EventFilter { from: Some(date), to: Some(date), ..Default::default() };
    Ok(Json(state.event_repo.list(&filter).await?))
}

pub async fn list_registered(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.event_repo.list_registered(&principal.id).await?))
}

pub async fn list_hosted(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let filter = EventFilter { host_id: Some(principal.id), ..Default::default() };
    Ok(Json(state.event_repo.list(&filter).await?))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.host_id != principal.id {
        return Err(AppError::Forbidden("Only the event owner can delete it".into()));
    }

    state.event_repo.delete(&id).await?;
    info!(event_id = %id, attendees = event.attendees.len(), "Event deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (event, user) = state.reservations.register_for_event(&id, &principal.id).await?;
    Ok(Json(RegistrationResponse { event, user }))
}

pub async fn cancel_registration(
    State(state): State<Arc<AppState>>,
    principal: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (event, user) = state.reservations.cancel_event_registration(&id, &principal.id).await?;
    Ok(Json(RegistrationResponse { event, user }))
}
