//! Booking status and its transition rules.

use serde::{Deserialize, Serialize};

/// The status of a booking.
///
/// Lifecycle:
/// ```text
/// Pending ──► Confirmed ──► Assigned ──► EnRoute ──► Arrived ──► InProgress ──► Completed
///    │            │
///    ├── Cancelled / Rescheduled (from Pending or Confirmed only)
///    │
/// Completed ──► Refunded is an admin-side concern; Completed, Cancelled
/// and Refunded are terminal.
/// ```
///
/// Provider-submitted statuses are not required to move one step at a time:
/// any of the five forward statuses is accepted while the booking is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Booking created, awaiting confirmation.
    #[default]
    Pending,

    /// Booking confirmed by the platform.
    Confirmed,

    /// A provider has been assigned.
    Assigned,

    /// The provider is on the way.
    EnRoute,

    /// The provider has arrived.
    Arrived,

    /// The service is being performed.
    InProgress,

    /// The service finished (terminal state).
    Completed,

    /// The booking was cancelled (terminal state).
    Cancelled,

    /// The booking was moved to a new time slot.
    Rescheduled,

    /// The payment was refunded (terminal state).
    Refunded,
}

impl BookingStatus {
    /// Returns true if the booking can be cancelled in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Returns true if the booking can be rescheduled in this status.
    pub fn can_reschedule(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Returns true if the booking can be confirmed in this status.
    pub fn can_confirm(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Rescheduled)
    }

    /// Returns true if a provider can be assigned in this status.
    pub fn can_assign(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }

    /// Returns true if this status can be submitted by a provider as a
    /// forward-chain update.
    pub fn is_provider_status(&self) -> bool {
        matches!(
            self,
            BookingStatus::Assigned
                | BookingStatus::EnRoute
                | BookingStatus::Arrived
                | BookingStatus::InProgress
                | BookingStatus::Completed
        )
    }

    /// Returns true if a provider-submitted status update is accepted
    /// while the booking sits in this status.
    pub fn accepts_provider_status(&self) -> bool {
        !self.is_terminal() && !matches!(self, BookingStatus::Rescheduled)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Refunded
        )
    }

    /// Returns the status name as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Assigned => "ASSIGNED",
            BookingStatus::EnRoute => "EN_ROUTE",
            BookingStatus::Arrived => "ARRIVED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Rescheduled => "RESCHEDULED",
            BookingStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
