mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{AuthHeaders, TestApp, HOST_ACCESS_KEY, HOST_ID};
use serde_json::{json, Value};
use tower::ServiceExt;

fn cookie_value(set_cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies.iter()
        .find(|c| c.starts_with(&prefix))
        .map(|c| c[prefix.len()..].split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_health_and_ping() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, body) = app.request("GET", "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Server is alive");
}

#[tokio::test]
async fn test_register_login_and_duplicate_email() {
    let app = TestApp::new().await;
    let payload = json!({
        "name": "Priya",
        "email": "Priya@Campus.edu",
        "password": "correct-horse",
        "role": "student",
        "college_id": "CS-2031"
    });

    let (status, body) = app.request("POST", "/api/auth/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["user"]["email"], "priya@campus.edu");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["access_token"].as_str().is_some());

    let (status, body) = app.request("POST", "/api/auth/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "CONFLICT");

    let (status, _) = app.request("POST", "/api/auth/login", None,
        Some(json!({ "email": "priya@campus.edu", "password": "wrong-horse" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.request("POST", "/api/auth/login", None,
        Some(json!({ "email": "PRIYA@campus.edu", "password": "correct-horse" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["college_id"], "CS-2031");
    assert_eq!(body["is_host"], false);
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let app = TestApp::new().await;
    let (status, body) = app.request("POST", "/api/auth/register", None, Some(json!({
        "name": "Eve",
        "email": "eve@campus.edu",
        "password": "secret-pass",
        "role": "admin",
        "college_id": "X-1"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION");
    assert!(body["error"].as_str().unwrap().contains("admin"), "{}", body);
}

#[tokio::test]
async fn test_login_carries_registered_events() {
    let app = TestApp::new().await;
    let organizer = app.principal("Organizer").await;
    let event = app.create_event(&organizer.auth, 5).await;
    let event_id = event["id"].as_str().unwrap();

    let (status, body) = app.request("POST", "/api/auth/register", None, Some(json!({
        "name": "Ravi",
        "email": "ravi@campus.edu",
        "password": "ravi-pass",
        "role": "faculty",
        "college_id": "FAC-7"
    }))).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let ravi = AuthHeaders {
        access_token: body["access_token"].as_str().unwrap().to_string(),
        csrf_token: body["csrf_token"].as_str().unwrap().to_string(),
    };

    let (status, _) = app.request("POST", &format!("/api/events/{}/register", event_id), Some(&ravi), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request("POST", "/api/auth/login", None,
        Some(json!({ "email": "ravi@campus.edu", "password": "ravi-pass" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["registered_event_ids"], json!([event_id]));
}

#[tokio::test]
async fn test_bearer_token_skips_csrf_but_cookie_requires_it() {
    let app = TestApp::new().await;
    let a = app.principal("Alice").await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/auth/skills")
            .header(header::AUTHORIZATION, format!("Bearer {}", a.auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "skills": ["rust", " ", "sql"] }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let user: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(user["skills"], json!(["rust", "sql"]));

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri("/api/auth/skills")
            .header(header::COOKIE, format!("access_token={}", a.auth.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "skills": [] }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (status, _) = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(
        Request::builder()
            .uri("/api/auth/me")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let app = TestApp::new().await;
    app.request("POST", "/api/auth/register", None, Some(json!({
        "name": "Ravi", "email": "ravi@campus.edu", "password": "pass-1234",
        "role": "faculty", "college_id": "FAC-7"
    }))).await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "email": "ravi@campus.edu", "password": "pass-1234" }).to_string()))
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<String> = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();
    let refresh_token = cookie_value(&cookies, "refresh_token").expect("No refresh_token cookie returned");
    assert!(cookie_value(&cookies, "access_token").is_some());

    let refresh = |token: String| {
        let router = app.router.clone();
        async move {
            router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/refresh")
                    .header(header::COOKIE, format!("refresh_token={}", token))
                    .body(Body::empty())
                    .unwrap()
            ).await.unwrap()
        }
    };

    let rotated = refresh(refresh_token.clone()).await;
    assert_eq!(rotated.status(), StatusCode::OK);
    let rotated_cookies: Vec<String> = rotated.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();
    let new_refresh = cookie_value(&rotated_cookies, "refresh_token").unwrap();
    assert_ne!(new_refresh, refresh_token);

    // The old token was consumed by rotation.
    assert_eq!(refresh(refresh_token).await.status(), StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, format!("refresh_token={}", new_refresh))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(refresh(new_refresh).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_id() {
    let app = TestApp::new().await;
    let a = app.principal("Alice").await;

    let (status, body) = app.request("POST", "/api/auth/verify-id", None,
        Some(json!({ "college_id": a.user.college_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registered"], true);

    let (_, body) = app.request("POST", "/api/auth/verify-id", None,
        Some(json!({ "college_id": "UNKNOWN-1" }))).await;
    assert_eq!(body["registered"], false);
    assert_eq!(body["college_id"], "UNKNOWN-1");
}

#[tokio::test]
async fn test_host_verification_gates_admin_routes() {
    let app = TestApp::new().await;
    let a = app.principal("Alice").await;

    let (status, body) = app.request("GET", "/api/host/parking/all", Some(&a.auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "FORBIDDEN");

    let (status, _) = app.request("POST", "/api/auth/verify-host", Some(&a.auth),
        Some(json!({ "host_id": HOST_ID, "access_key": "wrong-key" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("POST", "/api/auth/verify-host", Some(&a.auth),
        Some(json!({ "host_id": "someone-else", "access_key": HOST_ACCESS_KEY }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let host = app.host().await;
    let (status, body) = app.request("GET", "/api/host/parking/all", Some(&host), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
