use campus_events::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::user::{NewUserParams, PrincipalRole, User},
    infra::factory::{seed_host, sqlite_state},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

pub const HOST_ID: &str = "campus-admin";
pub const HOST_ACCESS_KEY: &str = "letmein-host";

#[derive(Clone)]
pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct Principal {
    pub user: User,
    pub auth: AuthHeaders,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            host_id: Some(HOST_ID.to_string()),
            host_access_key: Some(HOST_ACCESS_KEY.to_string()),
        };

        let state = Arc::new(sqlite_state(pool.clone(), config).expect("Failed to build state"));
        seed_host(&state).await.expect("Failed to seed host");

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        call(self.router.clone(), method, uri, auth, body).await
    }

    /// Creates a principal directly in storage and mints tokens for it.
    pub async fn principal(&self, name: &str) -> Principal {
        let tag = Uuid::new_v4().simple().to_string();
        let user = User::new(NewUserParams {
            name: name.to_string(),
            email: format!("{}-{}@campus.test", name.to_lowercase().replace(' ', "."), tag),
            password_hash: "not-used".to_string(),
            role: PrincipalRole::Student,
            college_id: format!("COL-{}", tag),
        });
        let user = self.state.user_repo.create(&user).await.expect("Failed to create principal");

        let tokens = self.state.auth_service.login(&user, false).await.expect("Failed to mint tokens");
        Principal {
            user,
            auth: AuthHeaders {
                access_token: tokens.access_token,
                csrf_token: tokens.csrf_token,
            },
        }
    }

    /// A principal that passed host verification.
    pub async fn host(&self) -> AuthHeaders {
        let principal = self.principal("Host").await;
        let (status, body) = self.request(
            "POST",
            "/api/auth/verify-host",
            Some(&principal.auth),
            Some(json!({ "host_id": HOST_ID, "access_key": HOST_ACCESS_KEY })),
        ).await;
        assert_eq!(status, StatusCode::OK, "host verification failed: {}", body);

        AuthHeaders {
            access_token: body["access_token"].as_str().unwrap().to_string(),
            csrf_token: body["csrf_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_event(&self, auth: &AuthHeaders, capacity: i32) -> Value {
        self.create_event_with(auth, json!({
            "title": "Intro to Systems Programming",
            "description": "Hands-on workshop",
            "category": "technical",
            "subcategory": "workshop",
            "date": "2030-05-20",
            "time": "14:00",
            "location": "Lab 3",
            "price": 0.0,
            "capacity": capacity,
            "skills": ["rust"]
        })).await
    }

    pub async fn create_event_with(&self, auth: &AuthHeaders, payload: Value) -> Value {
        let (status, body) = self.request("POST", "/api/events", Some(auth), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "event creation failed: {}", body);
        body
    }

    pub async fn create_slot(&self, host: &AuthHeaders, slot_number: &str, area: &str) -> Value {
        let (status, body) = self.request(
            "POST",
            "/api/host/parking/slots",
            Some(host),
            Some(json!({ "slot_number": slot_number, "area": area, "vehicle_type": "car" })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "slot creation failed: {}", body);
        body
    }
}

/// Sends a request using cookie auth plus the CSRF header, like a browser would.
#[allow(dead_code)]
pub async fn call(router: Router, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };

    (status, value)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
