//! HTTP route handlers.

pub mod bookings;
pub mod cart;
pub mod catalog;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod tracking;
