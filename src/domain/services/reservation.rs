use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};
use crate::domain::models::{
    event::Event,
    parking::{ParkingSlot, SlotBooking},
    reservation::{settle_release, settle_reserve, Reservable, Releaser, ReservationError},
    user::User,
};
use crate::domain::ports::{EventRepository, ParkingRepository, UserRepository};
use crate::error::AppError;

/// Event seats and parking slots under one contract: at most N holders,
/// no duplicates, release only by the holder (or a host for exclusive
/// resources). The guard and the write happen in a single conditional
/// storage operation, so nothing here holds state between requests.
pub struct ReservationService {
    events: Arc<dyn EventRepository>,
    parking: Arc<dyn ParkingRepository>,
    users: Arc<dyn UserRepository>,
}

impl ReservationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        parking: Arc<dyn ParkingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { events, parking, users }
    }

    pub async fn register_for_event(&self, event_id: &str, claimant_id: &str) -> Result<(Event, User), AppError> {
        let applied = self.events.reserve_seat(event_id, claimant_id, Utc::now()).await?;
        let current = match applied {
            Some(_) => None,
            None => self.events.find_by_id(event_id).await?,
        };

        let event = settle_reserve(applied, current, claimant_id).inspect_err(|e| {
            warn!(event_id, claimant_id, kind = e.kind(), "registration rejected");
        })?;
        info!(event_id, claimant_id, attendees = event.attendees.len(), capacity = event.capacity, "registered for event");

        let user = self.load_claimant(claimant_id).await?;
        Ok((event, user))
    }

    pub async fn cancel_event_registration(&self, event_id: &str, claimant_id: &str) -> Result<(Event, User), AppError> {
        let applied = self.events.release_seat(event_id, claimant_id).await?;
        let current = match applied {
            Some(_) => None,
            None => self.events.find_by_id(event_id).await?,
        };

        let releaser = Releaser::Claimant(claimant_id.to_string());
        let event = settle_release(applied, current, &releaser).inspect_err(|e| {
            warn!(event_id, claimant_id, kind = e.kind(), "registration cancel rejected");
        })?;
        info!(event_id, claimant_id, "registration cancelled");

        let user = self.load_claimant(claimant_id).await?;
        Ok((event, user))
    }

    pub async fn book_slot(&self, slot_id: &str, claimant_id: &str, event_id: String, vehicle_number: String) -> Result<ParkingSlot, AppError> {
        let booking = SlotBooking {
            event_id,
            vehicle_number,
            booked_at: Utc::now(),
        };

        let applied = self.parking.book(slot_id, claimant_id, &booking).await?;
        let current = match applied {
            Some(_) => None,
            None => self.parking.find_by_id(slot_id).await?,
        };

        // The write is also guarded on the event existing, so a refusal
        // against a live slot may be a missing event.
        if current.is_some() && self.events.find_by_id(&booking.event_id).await?.is_none() {
            warn!(slot_id, claimant_id, event_id = %booking.event_id, kind = "NOT_FOUND", "parking booking rejected");
            return Err(ReservationError::NotFound(Event::LABEL).into());
        }

        let slot = settle_reserve(applied, current, claimant_id).inspect_err(|e| {
            warn!(slot_id, claimant_id, kind = e.kind(), "parking booking rejected");
        })?;
        info!(slot_id, claimant_id, slot_number = %slot.slot_number, "parking slot booked");
        Ok(slot)
    }

    pub async fn release_slot(&self, slot_id: &str, releaser: Releaser) -> Result<ParkingSlot, AppError> {
        let holder = match &releaser {
            Releaser::Claimant(id) => Some(id.as_str()),
            Releaser::Host => None,
        };

        let applied = self.parking.release(slot_id, holder).await?;
        let current = match applied {
            Some(_) => None,
            None => self.parking.find_by_id(slot_id).await?,
        };

        let slot = settle_release(applied, current, &releaser).inspect_err(|e| {
            warn!(slot_id, releaser = ?releaser, kind = e.kind(), "parking release rejected");
        })?;
        info!(slot_id, releaser = ?releaser, "parking slot released");
        Ok(slot)
    }

    async fn load_claimant(&self, claimant_id: &str) -> Result<User, AppError> {
        self.users.find_by_id(claimant_id).await?
            .ok_or(AppError::NotFound("User not found".into()))
    }
}
