use crate::domain::models::{
    event::EventCategory,
    food::{FoodCategory, OrderStatus},
    parking::VehicleType,
    user::PrincipalRole,
};
use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: PrincipalRole,
    pub college_id: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "name")?;
        require(&self.college_id, "college_id")?;
        if !self.email.contains('@') {
            return Err(AppError::Validation("email is invalid".into()));
        }
        if self.password.len() < 6 {
            return Err(AppError::Validation("password must be at least 6 characters".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateSkillsRequest {
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct VerifyIdRequest {
    pub college_id: String,
}

#[derive(Deserialize)]
pub struct VerifyHostRequest {
    pub host_id: String,
    pub access_key: String,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    #[serde(default)]
    pub subcategory: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: f64,
    pub capacity: i32,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.title, "title")?;
        require(&self.location, "location")?;
        if self.capacity <= 0 {
            return Err(AppError::Validation("capacity must be greater than 0".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        if NaiveTime::parse_from_str(&self.time, "%H:%M").is_err() {
            return Err(AppError::Validation("time must be HH:MM".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Default)]
pub struct EventQuery {
    pub category: Option<EventCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct BookParkingRequest {
    #[serde(alias = "eventId")]
    pub event_id: String,
    #[serde(alias = "vehicleNumber")]
    pub vehicle_number: String,
}

impl BookParkingRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.event_id, "event_id")?;
        require(&self.vehicle_number, "vehicle_number")
    }
}

#[derive(Deserialize)]
pub struct CreateParkingSlotRequest {
    pub slot_number: String,
    pub area: String,
    pub vehicle_type: VehicleType,
}

impl CreateParkingSlotRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.slot_number, "slot_number")?;
        require(&self.area, "area")
    }
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub item_id: String,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub event_id: Option<String>,
    pub delivery_location: String,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.items.is_empty() {
            return Err(AppError::Validation("order must contain at least one item".into()));
        }
        if self.items.iter().any(|i| i.quantity < 1) {
            return Err(AppError::Validation("quantity must be at least 1".into()));
        }
        require(&self.delivery_location, "delivery_location")
    }
}

#[derive(Deserialize)]
pub struct CreateFoodItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: FoodCategory,
    pub is_available: Option<bool>,
    pub image: Option<String>,
}

impl CreateFoodItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "name")?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("price must not be negative".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
