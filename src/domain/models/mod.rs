pub mod auth;
pub mod event;
pub mod food;
pub mod host;
pub mod parking;
pub mod reservation;
pub mod user;
