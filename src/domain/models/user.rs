use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalRole {
    Student,
    Faculty,
    Other,
}

impl PrincipalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalRole::Student => "student",
            PrincipalRole::Faculty => "faculty",
            PrincipalRole::Other => "other",
        }
    }
}

/// A registered principal. `registered_event_ids` is not stored on the row,
/// it is derived from `event_attendees` whenever the user is loaded.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub college_id: String,
    pub skills: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub registered_event_ids: Vec<String>,
}

pub struct NewUserParams {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: PrincipalRole,
    pub college_id: String,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            email: params.email.trim().to_lowercase(),
            password_hash: params.password_hash,
            role: params.role.as_str().to_string(),
            college_id: params.college_id,
            skills: Json(Vec::new()),
            created_at: Utc::now(),
            registered_event_ids: Vec::new(),
        }
    }
}
