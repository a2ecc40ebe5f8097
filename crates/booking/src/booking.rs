//! The booking record and its in-memory store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Actor, BookingId, Money, PetId, ServiceId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::BookingError;
use crate::status::BookingStatus;

/// A scheduled service appointment for a pet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub pet_id: PetId,
    pub service_id: ServiceId,
    /// Service name frozen at booking time.
    pub service_name: String,
    pub price: Money,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// The slot this booking held before its last reschedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Returns true if the actor is the assigned provider for this booking.
    pub fn is_assigned_provider(&self, actor: Actor) -> bool {
        self.provider_id == Some(actor.user_id)
    }
}

/// In-memory booking store.
///
/// Mutation happens through closures run under the store's write lock, so
/// a check-then-update sequence on one booking can never interleave with
/// another writer.
#[derive(Clone, Default)]
pub struct BookingStore {
    bookings: Arc<RwLock<HashMap<BookingId, Booking>>>,
}

impl BookingStore {
    /// Creates a new empty booking store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a newly created booking.
    pub async fn insert(&self, booking: Booking) {
        self.bookings.write().await.insert(booking.id, booking);
    }

    /// Returns a booking if the actor owns it, is its assigned provider,
    /// or is an admin.
    pub async fn get(&self, actor: Actor, booking_id: BookingId) -> Result<Booking, BookingError> {
        let bookings = self.bookings.read().await;
        let booking = bookings
            .get(&booking_id)
            .ok_or(BookingError::NotFound(booking_id))?;
        if !actor.owns_or_admin(booking.user_id) && !booking.is_assigned_provider(actor) {
            return Err(BookingError::Unauthorized(booking_id));
        }
        Ok(booking.clone())
    }

    /// Returns all bookings for a user, soonest scheduled first.
    pub async fn for_user(&self, user_id: UserId) -> Vec<Booking> {
        let bookings = self.bookings.read().await;
        let mut result: Vec<_> = bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|b| b.scheduled_at);
        result
    }

    /// Runs a fallible mutation on one booking under the write lock and
    /// returns the updated record. `updated_at` is bumped on success.
    pub(crate) async fn update<F>(
        &self,
        booking_id: BookingId,
        mutate: F,
    ) -> Result<Booking, BookingError>
    where
        F: FnOnce(&mut Booking) -> Result<(), BookingError>,
    {
        let mut bookings = self.bookings.write().await;
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or(BookingError::NotFound(booking_id))?;
        mutate(booking)?;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}
