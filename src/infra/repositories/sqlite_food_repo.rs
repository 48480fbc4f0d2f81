use crate::domain::{
    models::food::{FoodItem, FoodOrder},
    ports::FoodRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteFoodRepo {
    pool: SqlitePool,
}

impl SqliteFoodRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FoodRepository for SqliteFoodRepo {
    async fn create_item(&self, item: &FoodItem) -> Result<FoodItem, AppError> {
        sqlx::query_as::<_, FoodItem>(
            r#"INSERT INTO food_items (id, name, description, price, category, is_available, image, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&item.id)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.price)
            .bind(&item.category)
            .bind(item.is_available)
            .bind(&item.image)
            .bind(item.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_item(&self, id: &str) -> Result<Option<FoodItem>, AppError> {
        sqlx::query_as::<_, FoodItem>("SELECT * FROM food_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_items(&self, ids: &[String]) -> Result<Vec<FoodItem>, AppError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM food_items WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        builder
            .build_query_as::<FoodItem>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_items(&self, only_available: bool, category: Option<&str>) -> Result<Vec<FoodItem>, AppError> {
        sqlx::query_as::<_, FoodItem>(
            r#"SELECT * FROM food_items
               WHERE (? = 0 OR is_available = 1)
                 AND (? IS NULL OR category = ?)
               ORDER BY category ASC, name ASC"#
        )
            .bind(only_available)
            .bind(category)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_availability(&self, id: &str, is_available: bool) -> Result<Option<FoodItem>, AppError> {
        sqlx::query_as::<_, FoodItem>("UPDATE food_items SET is_available = ? WHERE id = ? RETURNING *")
            .bind(is_available)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_item(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM food_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_order(&self, order: &FoodOrder) -> Result<FoodOrder, AppError> {
        sqlx::query_as::<_, FoodOrder>(
            r#"INSERT INTO food_orders (id, user_id, items, total, status, event_id, delivery_location, order_date)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               RETURNING *"#
        )
            .bind(&order.id)
            .bind(&order.user_id)
            .bind(&order.items)
            .bind(order.total)
            .bind(&order.status)
            .bind(&order.event_id)
            .bind(&order.delivery_location)
            .bind(order.order_date)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_order(&self, id: &str) -> Result<Option<FoodOrder>, AppError> {
        sqlx::query_as::<_, FoodOrder>("SELECT * FROM food_orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_orders_by_user(&self, user_id: &str) -> Result<Vec<FoodOrder>, AppError> {
        sqlx::query_as::<_, FoodOrder>("SELECT * FROM food_orders WHERE user_id = ? ORDER BY order_date DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_orders(&self) -> Result<Vec<FoodOrder>, AppError> {
        sqlx::query_as::<_, FoodOrder>("SELECT * FROM food_orders ORDER BY order_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_order_status(&self, id: &str, status: &str) -> Result<Option<FoodOrder>, AppError> {
        sqlx::query_as::<_, FoodOrder>("UPDATE food_orders SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel_order(&self, id: &str) -> Result<Option<FoodOrder>, AppError> {
        sqlx::query_as::<_, FoodOrder>(
            r#"UPDATE food_orders SET status = 'cancelled'
               WHERE id = ? AND status NOT IN ('ready', 'delivered')
               RETURNING *"#
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
