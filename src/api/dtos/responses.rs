use crate::domain::models::{event::Event, parking::ParkingSlot, user::User};
use serde::{Deserialize, Serialize};

/// Outcome of a registration or cancellation: both sides of the reservation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub event: Event,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyIdResponse {
    pub college_id: String,
    pub registered: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParkingReleaseResponse {
    pub message: String,
    pub slot: ParkingSlot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
