use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use crate::domain::models::reservation::{Reservable, ReservationError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EventCategory {
    Technical,
    NonTechnical,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Technical => "technical",
            EventCategory::NonTechnical => "non-technical",
            EventCategory::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "technical" => Some(EventCategory::Technical),
            "non-technical" => Some(EventCategory::NonTechnical),
            "other" => Some(EventCategory::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: f64,
    pub capacity: i32,
    pub host_id: String,
    pub skills: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub attendees: Vec<String>,
}

pub struct NewEventParams {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub subcategory: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: f64,
    pub capacity: i32,
    pub host_id: String,
    pub skills: Vec<String>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            category: params.category.as_str().to_string(),
            subcategory: params.subcategory,
            date: params.date,
            time: params.time,
            location: params.location,
            price: params.price,
            capacity: params.capacity,
            host_id: params.host_id,
            skills: Json(params.skills),
            created_at: Utc::now(),
            attendees: Vec::new(),
        }
    }
}

impl Reservable for Event {
    const LABEL: &'static str = "Event";

    fn seats(&self) -> usize {
        self.capacity.max(0) as usize
    }

    fn holders(&self) -> Vec<&str> {
        self.attendees.iter().map(String::as_str).collect()
    }

    fn exhausted(&self) -> ReservationError {
        ReservationError::AtCapacity(Self::LABEL)
    }
}

/// One row of the host-facing registration report.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub college_id: String,
    pub registered_at: DateTime<Utc>,
}

/// Query-surface filter over events; unset fields do not constrain.
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub category: Option<EventCategory>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub host_id: Option<String>,
}
