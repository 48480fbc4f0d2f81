use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, EventRepository, FoodRepository, HostRepository, ParkingRepository,
    UserRepository,
};
use crate::domain::services::{auth_service::AuthService, reservation::ReservationService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub host_repo: Arc<dyn HostRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub parking_repo: Arc<dyn ParkingRepository>,
    pub food_repo: Arc<dyn FoodRepository>,
    pub auth_service: Arc<AuthService>,
    pub reservations: Arc<ReservationService>,
}
