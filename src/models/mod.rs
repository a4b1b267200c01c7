pub mod booking;
pub mod booking_request;
pub mod inventory;
pub mod message;
pub mod notification;
pub mod profile;
pub mod session;
pub mod user;
pub mod verification;
