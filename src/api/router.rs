use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, patch, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, event, parking, food, host};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ping", get(health::ping))

        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/skills", put(auth::update_skills))
        .route("/api/auth/verify-id", post(auth::verify_id))
        .route("/api/auth/verify-host", post(auth::verify_host))

        // Events
        .route("/api/events", post(event::create_event).get(event::list_events))
        .route("/api/events/category/{category}", get(event::list_by_category))
        .route("/api/events/date/{date}", get(event::list_by_date))
        .route("/api/events/user/registered", get(event::list_registered))
        .route("/api/events/user/hosted", get(event::list_hosted))
        .route("/api/events/{id}", get(event::get_event).delete(event::delete_event))
        .route("/api/events/{id}/register", post(event::register).delete(event::cancel_registration))

        // Parking
        .route("/api/parking", get(parking::list_slots))
        .route("/api/parking/available", get(parking::list_available))
        .route("/api/parking/user", get(parking::list_mine))
        .route("/api/parking/book/{id}", post(parking::book_slot))
        .route("/api/parking/cancel/{id}", delete(parking::cancel_booking))

        // Food
        .route("/api/food/items", get(food::list_items))
        .route("/api/food/items/{category}", get(food::list_items_by_category))
        .route("/api/food/order", post(food::create_order))
        .route("/api/food/orders", get(food::list_orders))
        .route("/api/food/orders/{id}", get(food::get_order).delete(food::cancel_order))

        // Host administration
        .route("/api/host/food/items/all", get(host::list_all_items))
        .route("/api/host/food/items", post(host::create_item))
        .route("/api/host/food/items/{id}", delete(host::delete_item))
        .route("/api/host/food/items/{id}/toggle", patch(host::toggle_item))
        .route("/api/host/food/orders/all", get(host::list_all_orders))
        .route("/api/host/food/orders/{id}/status", patch(host::update_order_status))
        .route("/api/host/parking/all", get(host::list_all_slots))
        .route("/api/host/parking/slots", post(host::create_slot))
        .route("/api/host/parking/slots/{id}", delete(host::delete_slot))
        .route("/api/host/parking/bookings", get(host::list_bookings))
        .route("/api/host/parking/bookings/{id}", delete(host::release_booking))
        .route("/api/host/events/{id}/registrations", get(host::list_registrations))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
