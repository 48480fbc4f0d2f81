use crate::domain::{
    models::event::{Event, EventFilter, Registration},
    ports::EventRepository,
};
use crate::error::{is_foreign_key_violation, AppError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn with_attendees(&self, mut event: Event) -> Result<Event, AppError> {
        event.attendees = sqlx::query_scalar::<_, String>(
            "SELECT user_id FROM event_attendees WHERE event_id = ? ORDER BY registered_at ASC",
        )
            .bind(&event.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(event)
    }

    async fn with_attendees_all(&self, events: Vec<Event>) -> Result<Vec<Event>, AppError> {
        let mut loaded = Vec::with_capacity(events.len());
        for event in events {
            loaded.push(self.with_attendees(event).await?);
        }
        Ok(loaded)
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, category, subcategory, date, time,
                location, price, capacity, host_id, skills, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.category)
            .bind(&event.subcategory)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(event.price)
            .bind(event.capacity)
            .bind(&event.host_id)
            .bind(&event.skills)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match event {
            Some(event) => Ok(Some(self.with_attendees(event).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError> {
        let category = filter.category.map(|c| c.as_str());
        let events = sqlx::query_as::<_, Event>(
            r#"SELECT * FROM events
               WHERE (? IS NULL OR category = ?)
                 AND (? IS NULL OR date >= ?)
                 AND (? IS NULL OR date <= ?)
                 AND (? IS NULL OR host_id = ?)
               ORDER BY date ASC, time ASC"#
        )
            .bind(category).bind(category)
            .bind(filter.from).bind(filter.from)
            .bind(filter.to).bind(filter.to)
            .bind(&filter.host_id).bind(&filter.host_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.with_attendees_all(events).await
    }

    async fn list_registered(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"SELECT e.* FROM events e
               JOIN event_attendees a ON a.event_id = e.id
               WHERE a.user_id = ?
               ORDER BY e.date ASC, e.time ASC"#
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        self.with_attendees_all(events).await
    }

    async fn list_registrations(&self, event_id: &str) -> Result<Vec<Registration>, AppError> {
        sqlx::query_as::<_, Registration>(
            r#"SELECT u.id AS user_id, u.name, u.email, u.college_id, a.registered_at
               FROM event_attendees a
               JOIN users u ON u.id = a.user_id
               WHERE a.event_id = ?
               ORDER BY a.registered_at ASC"#
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM events WHERE id = ? AND NOT EXISTS (SELECT 1 FROM parking_slots WHERE event_id = ?)",
        )
            .bind(id)
            .bind(id)
            .execute(&self.pool)
            .await;

        let result = match result {
            Ok(result) => result,
            Err(e) if is_foreign_key_violation(&e) => return Err(parking_conflict()),
            Err(e) => return Err(AppError::Database(e)),
        };

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM events WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if exists {
            Err(parking_conflict())
        } else {
            Err(AppError::NotFound("Event not found".into()))
        }
    }

    async fn reserve_seat(&self, event_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<Option<Event>, AppError> {
        // Single statement: SQLite serializes writers, so the guard is
        // evaluated against the state the insert commits on.
        let result = sqlx::query(
            r#"INSERT INTO event_attendees (event_id, user_id, registered_at)
               SELECT e.id, ?, ? FROM events e
               WHERE e.id = ?
                 AND NOT EXISTS (SELECT 1 FROM event_attendees a WHERE a.event_id = e.id AND a.user_id = ?)
                 AND (SELECT COUNT(*) FROM event_attendees a WHERE a.event_id = e.id) < e.capacity"#
        )
            .bind(user_id)
            .bind(at)
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(event_id).await
    }

    async fn release_seat(&self, event_id: &str, user_id: &str) -> Result<Option<Event>, AppError> {
        let result = sqlx::query("DELETE FROM event_attendees WHERE event_id = ? AND user_id = ?")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(event_id).await
    }
}

fn parking_conflict() -> AppError {
    AppError::Conflict("Event still has parking bookings".into())
}
