//! Site Check-In — jobsite visitor/contractor check-in service.

pub mod checkin;
pub mod client;
pub mod config;
pub mod error;
pub mod store;
