//! Status-to-progress lookup.
//!
//! Pure and stateless: kept apart from the update log so the mapping is
//! trivially unit-testable.

use booking::BookingStatus;
use serde::{Deserialize, Serialize};

/// Where a booking sits on the customer-facing progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub status: BookingStatus,
    /// Progress bar index, 0 (just booked) through 5 (done).
    pub progress: u8,
    /// Rough minutes until the provider's next milestone, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<u32>,
}

impl LiveStatus {
    /// Builds the live view for a status.
    pub fn for_status(status: BookingStatus) -> Self {
        Self {
            status,
            progress: progress_index(status),
            eta_minutes: eta_minutes(status),
        }
    }
}

/// Maps a status to its progress bar index (0-5).
///
/// Cancelled, rescheduled, and refunded bookings show no progress.
pub fn progress_index(status: BookingStatus) -> u8 {
    match status {
        BookingStatus::Pending => 0,
        BookingStatus::Confirmed => 1,
        BookingStatus::Assigned => 2,
        BookingStatus::EnRoute => 3,
        BookingStatus::Arrived | BookingStatus::InProgress => 4,
        BookingStatus::Completed => 5,
        BookingStatus::Cancelled | BookingStatus::Rescheduled | BookingStatus::Refunded => 0,
    }
}

/// Rough ETA to the next milestone, in minutes.
pub fn eta_minutes(status: BookingStatus) -> Option<u32> {
    match status {
        BookingStatus::Assigned => Some(30),
        BookingStatus::EnRoute => Some(15),
        BookingStatus::Arrived => Some(5),
        BookingStatus::InProgress => Some(45),
        _ => None,
    }
}
