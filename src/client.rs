//! Typed HTTP access to the campus events API, one method per operation
//! the UI performs. Failures carry the server's `kind` and message verbatim.

use crate::api::dtos::responses::{ParkingReleaseResponse, RegistrationResponse, VerifyIdResponse};
use crate::domain::models::{
    auth::AuthResponse,
    event::{Event, EventCategory},
    food::{FoodCategory, FoodItem, FoodOrder},
    parking::ParkingSlot,
    user::{PrincipalRole, User},
};
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} ({kind}, status {status})")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },
}

impl ClientError {
    /// Stable error kind reported by the server, if any.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Api { kind, .. } => Some(kind.as_str()),
            ClientError::Http(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub subcategory: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub price: f64,
    pub capacity: i32,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub item_id: String,
    pub quantity: i32,
}

pub struct CampusClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl CampusClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let res = req.send().await?;
        let status = res.status();

        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let (kind, message) = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => (body.kind, body.error),
                Err(_) => ("UNKNOWN".to_string(), text),
            };
            return Err(ClientError::Api { status: status.as_u16(), kind, message });
        }

        Ok(res.json::<T>().await?)
    }

    async fn authenticate(&mut self, req: RequestBuilder) -> Result<AuthResponse, ClientError> {
        let auth: AuthResponse = self.send(req).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    // Auth

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: PrincipalRole,
        college_id: &str,
    ) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/api/auth/register").json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "role": role,
            "college_id": college_id,
        }));
        self.authenticate(req).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/api/auth/login")
            .json(&json!({ "email": email, "password": password }));
        self.authenticate(req).await
    }

    pub async fn verify_host(&mut self, host_id: &str, access_key: &str) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/api/auth/verify-host")
            .json(&json!({ "host_id": host_id, "access_key": access_key }));
        self.authenticate(req).await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.send(self.request(Method::GET, "/api/auth/me")).await
    }

    pub async fn update_skills(&self, skills: &[String]) -> Result<User, ClientError> {
        let req = self.request(Method::PUT, "/api/auth/skills").json(&json!({ "skills": skills }));
        self.send(req).await
    }

    pub async fn verify_id(&self, college_id: &str) -> Result<VerifyIdResponse, ClientError> {
        let req = self.request(Method::POST, "/api/auth/verify-id").json(&json!({ "college_id": college_id }));
        self.send(req).await
    }

    // Events

    pub async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        self.send(self.request(Method::GET, "/api/events")).await
    }

    pub async fn events_by_category(&self, category: EventCategory) -> Result<Vec<Event>, ClientError> {
        let path = format!("/api/events/category/{}", category.as_str());
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn events_on(&self, date: NaiveDate) -> Result<Vec<Event>, ClientError> {
        let path = format!("/api/events/date/{}", date.format("%Y-%m-%d"));
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn get_event(&self, id: &str) -> Result<Event, ClientError> {
        self.send(self.request(Method::GET, &format!("/api/events/{}", id))).await
    }

    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ClientError> {
        self.send(self.request(Method::POST, "/api/events").json(draft)).await
    }

    pub async fn register_for_event(&self, id: &str) -> Result<RegistrationResponse, ClientError> {
        self.send(self.request(Method::POST, &format!("/api/events/{}/register", id))).await
    }

    pub async fn cancel_registration(&self, id: &str) -> Result<RegistrationResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/events/{}/register", id))).await
    }

    pub async fn registered_events(&self) -> Result<Vec<Event>, ClientError> {
        self.send(self.request(Method::GET, "/api/events/user/registered")).await
    }

    pub async fn hosted_events(&self) -> Result<Vec<Event>, ClientError> {
        self.send(self.request(Method::GET, "/api/events/user/hosted")).await
    }

    // Parking

    pub async fn parking_slots(&self) -> Result<Vec<ParkingSlot>, ClientError> {
        self.send(self.request(Method::GET, "/api/parking")).await
    }

    pub async fn available_parking(&self) -> Result<Vec<ParkingSlot>, ClientError> {
        self.send(self.request(Method::GET, "/api/parking/available")).await
    }

    pub async fn my_parking(&self) -> Result<Vec<ParkingSlot>, ClientError> {
        self.send(self.request(Method::GET, "/api/parking/user")).await
    }

    pub async fn book_parking(&self, slot_id: &str, event_id: &str, vehicle_number: &str) -> Result<ParkingSlot, ClientError> {
        let req = self.request(Method::POST, &format!("/api/parking/book/{}", slot_id))
            .json(&json!({ "event_id": event_id, "vehicle_number": vehicle_number }));
        self.send(req).await
    }

    pub async fn cancel_parking(&self, slot_id: &str) -> Result<ParkingReleaseResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/parking/cancel/{}", slot_id))).await
    }

    // Food

    pub async fn food_menu(&self) -> Result<Vec<FoodItem>, ClientError> {
        self.send(self.request(Method::GET, "/api/food/items")).await
    }

    pub async fn food_menu_for(&self, category: FoodCategory) -> Result<Vec<FoodItem>, ClientError> {
        let path = format!("/api/food/items/{}", category.as_str());
        self.send(self.request(Method::GET, &path)).await
    }

    pub async fn place_order(
        &self,
        items: &[OrderItem],
        event_id: Option<&str>,
        delivery_location: &str,
    ) -> Result<FoodOrder, ClientError> {
        let req = self.request(Method::POST, "/api/food/order").json(&json!({
            "items": items,
            "event_id": event_id,
            "delivery_location": delivery_location,
        }));
        self.send(req).await
    }

    pub async fn order_history(&self) -> Result<Vec<FoodOrder>, ClientError> {
        self.send(self.request(Method::GET, "/api/food/orders")).await
    }

    pub async fn cancel_order(&self, id: &str) -> Result<FoodOrder, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/food/orders/{}", id))).await
    }
}
