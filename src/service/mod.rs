pub mod booking_rules;
pub mod verification;
