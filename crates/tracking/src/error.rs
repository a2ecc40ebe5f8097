//! Tracking error types.

use booking::BookingError;
use thiserror::Error;

/// Errors that can occur while posting or reading tracking updates.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The underlying booking rejected the operation (unknown booking,
    /// illegal transition, or wrong actor).
    #[error(transparent)]
    Booking(#[from] BookingError),
}

pub type Result<T> = std::result::Result<T, TrackingError>;
