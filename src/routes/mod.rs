pub mod auth;
pub mod booking;
pub mod error;
pub mod health;
pub mod inventory;
pub mod message;
pub mod notification;
pub mod profile;
pub mod verification;
