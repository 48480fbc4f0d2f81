use crate::domain::models::{
    auth::RefreshTokenRecord,
    event::{Event, EventFilter, Registration},
    food::{FoodItem, FoodOrder},
    host::Host,
    parking::{ParkingSlot, SlotBooking},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    /// Both lookups load the user together with the derived `registered_event_ids`.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn exists_by_college_id(&self, college_id: &str) -> Result<bool, AppError>;
    async fn update_skills(&self, id: &str, skills: &[String]) -> Result<User, AppError>;
}

#[async_trait]
pub trait HostRepository: Send + Sync {
    async fn upsert(&self, host: &Host) -> Result<Host, AppError>;
    async fn find_by_host_id(&self, host_id: &str) -> Result<Option<Host>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    /// Loads the event together with its current attendee set.
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>, AppError>;
    async fn list_registered(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    async fn list_registrations(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
    /// Removes the event unless a parking booking still references it
    /// (`Conflict`). Attendee rows go with it.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Adds `user_id` to the attendees only if the event exists, the user is
    /// not already an attendee and a seat is free, as one indivisible step.
    /// Returns the updated event, or `None` when the guard did not hold.
    async fn reserve_seat(&self, event_id: &str, user_id: &str, at: DateTime<Utc>) -> Result<Option<Event>, AppError>;
    /// Removes `user_id` from the attendees. `None` when it was not there.
    async fn release_seat(&self, event_id: &str, user_id: &str) -> Result<Option<Event>, AppError>;
}

#[async_trait]
pub trait ParkingRepository: Send + Sync {
    async fn create(&self, slot: &ParkingSlot) -> Result<ParkingSlot, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ParkingSlot>, AppError>;
    async fn find_by_slot_number(&self, slot_number: &str) -> Result<Option<ParkingSlot>, AppError>;
    async fn list(&self) -> Result<Vec<ParkingSlot>, AppError>;
    async fn list_by_area(&self) -> Result<Vec<ParkingSlot>, AppError>;
    async fn list_available(&self) -> Result<Vec<ParkingSlot>, AppError>;
    async fn list_booked(&self) -> Result<Vec<ParkingSlot>, AppError>;
    async fn list_by_holder(&self, user_id: &str) -> Result<Vec<ParkingSlot>, AppError>;
    /// Deletes the slot only while it is unbooked. Returns whether a row went away.
    async fn delete_unbooked(&self, id: &str) -> Result<bool, AppError>;

    /// Compare-and-swap from unbooked to booked by `user_id`, guarded on
    /// `booking.event_id` naming an existing event.
    async fn book(&self, id: &str, user_id: &str, booking: &SlotBooking) -> Result<Option<ParkingSlot>, AppError>;
    /// Clears all booking fields. With `holder` set, only that principal's booking is released.
    async fn release(&self, id: &str, holder: Option<&str>) -> Result<Option<ParkingSlot>, AppError>;
}

#[async_trait]
pub trait FoodRepository: Send + Sync {
    async fn create_item(&self, item: &FoodItem) -> Result<FoodItem, AppError>;
    async fn find_item(&self, id: &str) -> Result<Option<FoodItem>, AppError>;
    async fn find_items(&self, ids: &[String]) -> Result<Vec<FoodItem>, AppError>;
    async fn list_items(&self, only_available: bool, category: Option<&str>) -> Result<Vec<FoodItem>, AppError>;
    async fn set_availability(&self, id: &str, is_available: bool) -> Result<Option<FoodItem>, AppError>;
    async fn delete_item(&self, id: &str) -> Result<bool, AppError>;

    async fn create_order(&self, order: &FoodOrder) -> Result<FoodOrder, AppError>;
    async fn find_order(&self, id: &str) -> Result<Option<FoodOrder>, AppError>;
    async fn list_orders_by_user(&self, user_id: &str) -> Result<Vec<FoodOrder>, AppError>;
    async fn list_orders(&self) -> Result<Vec<FoodOrder>, AppError>;
    async fn update_order_status(&self, id: &str, status: &str) -> Result<Option<FoodOrder>, AppError>;
    /// Cancels unless the order is already `ready` or `delivered`.
    async fn cancel_order(&self, id: &str) -> Result<Option<FoodOrder>, AppError>;
}
