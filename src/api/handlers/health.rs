use axum::response::IntoResponse;

pub async fn health_check() -> impl IntoResponse {
    "OK"
}

pub async fn ping() -> impl IntoResponse {
    "Server is alive"
}
