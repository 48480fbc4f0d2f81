use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::domain::models::reservation::{Reservable, ReservationError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Bike,
    Bus,
    Other,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Bus => "bus",
            VehicleType::Other => "other",
        }
    }
}

/// A single parking space. Either all four booking fields are set
/// (`is_booked`), or none of them are.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ParkingSlot {
    pub id: String,
    pub slot_number: String,
    pub area: String,
    pub vehicle_type: String,
    pub is_booked: bool,
    pub booked_by: Option<String>,
    pub event_id: Option<String>,
    pub booking_date: Option<DateTime<Utc>>,
    pub vehicle_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ParkingSlot {
    pub fn new(slot_number: String, area: String, vehicle_type: VehicleType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slot_number,
            area,
            vehicle_type: vehicle_type.as_str().to_string(),
            is_booked: false,
            booked_by: None,
            event_id: None,
            booking_date: None,
            vehicle_number: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        let fields = [
            self.booked_by.is_some(),
            self.event_id.is_some(),
            self.booking_date.is_some(),
            self.vehicle_number.is_some(),
        ];
        if self.is_booked {
            fields.iter().all(|set| *set)
        } else {
            fields.iter().all(|set| !*set)
        }
    }
}

/// What a claimant supplies alongside a slot booking.
#[derive(Debug, Clone)]
pub struct SlotBooking {
    pub event_id: String,
    pub vehicle_number: String,
    pub booked_at: DateTime<Utc>,
}

impl Reservable for ParkingSlot {
    const LABEL: &'static str = "Parking slot";

    fn seats(&self) -> usize {
        1
    }

    fn holders(&self) -> Vec<&str> {
        match (&self.booked_by, self.is_booked) {
            (Some(holder), true) => vec![holder.as_str()],
            _ => Vec::new(),
        }
    }

    fn exhausted(&self) -> ReservationError {
        ReservationError::AlreadyReserved(Self::LABEL)
    }

    fn is_exclusive(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_unbooked_and_consistent() {
        let slot = ParkingSlot::new("A-01".into(), "North".into(), VehicleType::Car);
        assert!(!slot.is_booked);
        assert!(slot.is_consistent());
        assert!(slot.holders().is_empty());
    }

    #[test]
    fn test_partially_booked_slot_is_inconsistent() {
        let mut slot = ParkingSlot::new("A-02".into(), "North".into(), VehicleType::Bike);
        slot.is_booked = true;
        slot.booked_by = Some("u1".into());
        assert!(!slot.is_consistent());

        slot.event_id = Some("e1".into());
        slot.booking_date = Some(Utc::now());
        slot.vehicle_number = Some("XYZ1".into());
        assert!(slot.is_consistent());
        assert_eq!(slot.holders(), vec!["u1"]);
    }
}
