use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Host {
    pub host_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub access_key_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Host {
    pub fn new(host_id: String, name: String, access_key_hash: String) -> Self {
        Self {
            host_id,
            name,
            access_key_hash,
            created_at: Utc::now(),
        }
    }
}
