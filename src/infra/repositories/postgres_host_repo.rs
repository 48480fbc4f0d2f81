use crate::domain::{models::host::Host, ports::HostRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresHostRepo {
    pool: PgPool,
}

impl PostgresHostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HostRepository for PostgresHostRepo {
    async fn upsert(&self, host: &Host) -> Result<Host, AppError> {
        sqlx::query_as::<_, Host>(
            "INSERT INTO hosts (host_id, name, access_key_hash, created_at) VALUES ($1, $2, $3, $4)
             ON CONFLICT(host_id) DO UPDATE SET name = excluded.name, access_key_hash = excluded.access_key_hash
             RETURNING *"
        )
            .bind(&host.host_id)
            .bind(&host.name)
            .bind(&host.access_key_hash)
            .bind(host.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_host_id(&self, host_id: &str) -> Result<Option<Host>, AppError> {
        sqlx::query_as::<_, Host>("SELECT * FROM hosts WHERE host_id = $1")
            .bind(host_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
