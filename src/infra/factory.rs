use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::{info, warn};
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::models::host::Host;
use crate::domain::services::{auth_service::AuthService, reservation::ReservationService};
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_event_repo::PostgresEventRepo,
    postgres_food_repo::PostgresFoodRepo, postgres_host_repo::PostgresHostRepo,
    postgres_parking_repo::PostgresParkingRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_food_repo::SqliteFoodRepo, sqlite_host_repo::SqliteHostRepo,
    sqlite_parking_repo::SqliteParkingRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(pool, config.clone()).expect("Failed to build application state")
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(pool, config.clone()).expect("Failed to build application state")
    };

    seed_host(&state).await.expect("Failed to seed host credentials");
    state
}

pub fn sqlite_state(pool: SqlitePool, config: Config) -> Result<AppState, AppError> {
    let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone())?);

    let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
    let event_repo = Arc::new(SqliteEventRepo::new(pool.clone()));
    let parking_repo = Arc::new(SqliteParkingRepo::new(pool.clone()));
    let reservations = Arc::new(ReservationService::new(
        event_repo.clone(),
        parking_repo.clone(),
        user_repo.clone(),
    ));

    Ok(AppState {
        config,
        user_repo,
        host_repo: Arc::new(SqliteHostRepo::new(pool.clone())),
        auth_repo,
        event_repo,
        parking_repo,
        food_repo: Arc::new(SqliteFoodRepo::new(pool)),
        auth_service,
        reservations,
    })
}

pub fn postgres_state(pool: PgPool, config: Config) -> Result<AppState, AppError> {
    let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
    let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone())?);

    let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
    let event_repo = Arc::new(PostgresEventRepo::new(pool.clone()));
    let parking_repo = Arc::new(PostgresParkingRepo::new(pool.clone()));
    let reservations = Arc::new(ReservationService::new(
        event_repo.clone(),
        parking_repo.clone(),
        user_repo.clone(),
    ));

    Ok(AppState {
        config,
        user_repo,
        host_repo: Arc::new(PostgresHostRepo::new(pool.clone())),
        auth_repo,
        event_repo,
        parking_repo,
        food_repo: Arc::new(PostgresFoodRepo::new(pool)),
        auth_service,
        reservations,
    })
}

/// Stores the configured host credential (`HOST_ID` / `HOST_ACCESS_KEY`).
pub async fn seed_host(state: &AppState) -> Result<(), AppError> {
    let (Some(host_id), Some(access_key)) = (&state.config.host_id, &state.config.host_access_key) else {
        warn!("HOST_ID/HOST_ACCESS_KEY not set, host administration is unavailable");
        return Ok(());
    };

    let hash = AuthService::hash_secret(access_key)?;
    let host = Host::new(host_id.clone(), "Campus Host".to_string(), hash);
    state.host_repo.upsert(&host).await?;

    info!(host_id = %host_id, "Host credential seeded");
    Ok(())
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
