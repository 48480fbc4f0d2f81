pub mod auth;
pub mod event;
pub mod food;
pub mod health;
pub mod host;
pub mod parking;
