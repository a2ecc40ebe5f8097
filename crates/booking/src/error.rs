//! Booking error types.

use catalog::CatalogError;
use common::BookingId;
use thiserror::Error;

use crate::status::BookingStatus;

/// Errors that can occur in the booking lifecycle.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The booking does not exist.
    #[error("Booking not found: {0}")]
    NotFound(BookingId),

    /// The booking is not in a status that allows the requested change.
    #[error("Invalid transition: cannot {action} from {current} status")]
    InvalidTransition {
        current: BookingStatus,
        action: &'static str,
    },

    /// Self-service cancellation attempted less than 24 hours before the
    /// scheduled time.
    #[error("Cancellation window expired: bookings can only be cancelled at least {hours} hours before the scheduled time")]
    CancellationWindowExpired { hours: i64 },

    /// The caller is neither the owner, the assigned provider (where that
    /// applies), nor an admin.
    #[error("Not authorized to act on booking {0}")]
    Unauthorized(BookingId),

    /// Catalog rejected the service (unknown or inactive).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, BookingError>;
