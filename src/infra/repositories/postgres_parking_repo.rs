use crate::domain::{
    models::parking::{ParkingSlot, SlotBooking},
    ports::ParkingRepository,
};
use crate::error::{is_foreign_key_violation, AppError};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresParkingRepo {
    pool: PgPool,
}

impl PostgresParkingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParkingRepository for PostgresParkingRepo {
    async fn create(&self, slot: &ParkingSlot) -> Result<ParkingSlot, AppError> {
        sqlx::query_as::<_, ParkingSlot>(
            r#"INSERT INTO parking_slots (
                id, slot_number, area, vehicle_type, is_booked,
                booked_by, event_id, booking_date, vehicle_number, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *"#
        )
            .bind(&slot.id)
            .bind(&slot.slot_number)
            .bind(&slot.area)
            .bind(&slot.vehicle_type)
            .bind(slot.is_booked)
            .bind(&slot.booked_by)
            .bind(&slot.event_id)
            .bind(slot.booking_date)
            .bind(&slot.vehicle_number)
            .bind(slot.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>("SELECT * FROM parking_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slot_number(&self, slot_number: &str) -> Result<Option<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>("SELECT * FROM parking_slots WHERE slot_number = $1")
            .bind(slot_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>("SELECT * FROM parking_slots ORDER BY slot_number ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_area(&self) -> Result<Vec<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>("SELECT * FROM parking_slots ORDER BY area ASC, slot_number ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_available(&self) -> Result<Vec<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>(
            "SELECT * FROM parking_slots WHERE is_booked = FALSE ORDER BY slot_number ASC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_booked(&self) -> Result<Vec<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>(
            "SELECT * FROM parking_slots WHERE is_booked = TRUE ORDER BY booking_date DESC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_holder(&self, user_id: &str) -> Result<Vec<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>(
            "SELECT * FROM parking_slots WHERE booked_by = $1 ORDER BY booking_date DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_unbooked(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM parking_slots WHERE id = $1 AND is_booked = FALSE")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn book(&self, id: &str, user_id: &str, booking: &SlotBooking) -> Result<Option<ParkingSlot>, AppError> {
        let result = sqlx::query_as::<_, ParkingSlot>(
            r#"UPDATE parking_slots
               SET is_booked = TRUE, booked_by = $1, event_id = $2, booking_date = $3, vehicle_number = $4
               WHERE id = $5 AND is_booked = FALSE
                 AND EXISTS (SELECT 1 FROM events WHERE id = $2 FOR KEY SHARE)
               RETURNING *"#
        )
            .bind(user_id)
            .bind(&booking.event_id)
            .bind(booking.booked_at)
            .bind(&booking.vehicle_number)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(slot) => Ok(slot),
            Err(e) if is_foreign_key_violation(&e) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn release(&self, id: &str, holder: Option<&str>) -> Result<Option<ParkingSlot>, AppError> {
        sqlx::query_as::<_, ParkingSlot>(
            r#"UPDATE parking_slots
               SET is_booked = FALSE, booked_by = NULL, event_id = NULL, booking_date = NULL, vehicle_number = NULL
               WHERE id = $1 AND is_booked = TRUE AND ($2::TEXT IS NULL OR booked_by = $2)
               RETURNING *"#
        )
            .bind(id)
            .bind(holder)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
