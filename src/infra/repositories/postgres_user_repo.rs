use crate::domain::{models::user::User, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, college_id, skills, created_at";

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_registrations(&self, mut user: User) -> Result<User, AppError> {
        user.registered_event_ids = sqlx::query_scalar::<_, String>(
            "SELECT event_id FROM event_attendees WHERE user_id = $1 ORDER BY registered_at ASC",
        )
            .bind(&user.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(&user.college_id)
            .bind(&user.skills)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match user {
            Some(user) => Ok(Some(self.with_registrations(user).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match user {
            Some(user) => Ok(Some(self.with_registrations(user).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_college_id(&self, college_id: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE college_id = $1)")
            .bind(college_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_skills(&self, id: &str, skills: &[String]) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET skills = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
        ))
            .bind(Json(skills))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("User not found".into()))?;

        self.with_registrations(user).await
    }
}
