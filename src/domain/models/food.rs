use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Snacks,
    Meals,
    Beverages,
    Desserts,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Snacks => "snacks",
            FoodCategory::Meals => "meals",
            FoodCategory::Beverages => "beverages",
            FoodCategory::Desserts => "desserts",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "snacks" => Some(FoodCategory::Snacks),
            "meals" => Some(FoodCategory::Meals),
            "beverages" => Some(FoodCategory::Beverages),
            "desserts" => Some(FoodCategory::Desserts),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Orders already handed over (or about to be) stay as they are.
    pub fn is_cancellable(status: &str) -> bool {
        !matches!(status, "ready" | "delivered")
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub is_available: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FoodItem {
    pub fn new(
        name: String,
        description: Option<String>,
        price: f64,
        category: FoodCategory,
        is_available: bool,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            price,
            category: category.as_str().to_string(),
            is_available,
            image,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct FoodOrder {
    pub id: String,
    pub user_id: String,
    pub items: Json<Vec<OrderLine>>,
    pub total: f64,
    pub status: String,
    pub event_id: Option<String>,
    pub delivery_location: String,
    pub order_date: DateTime<Utc>,
}

impl FoodOrder {
    pub fn new(user_id: String, items: Vec<OrderLine>, event_id: Option<String>, delivery_location: String) -> Self {
        let total = items.iter().map(|l| l.unit_price * l.quantity as f64).sum();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            items: Json(items),
            total,
            status: OrderStatus::Pending.as_str().to_string(),
            event_id,
            delivery_location,
            order_date: Utc::now(),
        }
    }
}
