pub mod sqlite_auth_repo;
pub mod sqlite_event_repo;
pub mod sqlite_food_repo;
pub mod sqlite_host_repo;
pub mod sqlite_parking_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_event_repo;
pub mod postgres_food_repo;
pub mod postgres_host_repo;
pub mod postgres_parking_repo;
pub mod postgres_user_repo;
