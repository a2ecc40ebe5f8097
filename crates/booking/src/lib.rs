//! Booking lifecycle: scheduled service appointments and their state machine.

pub mod booking;
pub mod error;
pub mod service;
pub mod status;

pub use booking::{Booking, BookingStore};
pub use error::BookingError;
pub use service::{BookingService, CANCELLATION_WINDOW_HOURS};
pub use status::BookingStatus;
