//! Booking lifecycle operations.

use catalog::ServiceDirectory;
use chrono::{DateTime, Duration, Utc};
use common::{Actor, BookingId, PetId, ServiceId, UserId};

use crate::booking::{Booking, BookingStore};
use crate::error::{BookingError, Result};
use crate::status::BookingStatus;

/// Self-service cancellation must happen at least this many hours before
/// the scheduled time. Admins are exempt.
pub const CANCELLATION_WINDOW_HOURS: i64 = 24;

/// Drives the booking lifecycle over a [`BookingStore`].
#[derive(Clone)]
pub struct BookingService {
    store: BookingStore,
    services: ServiceDirectory,
}

impl BookingService {
    /// Creates a booking service over the given store and service directory.
    pub fn new(store: BookingStore, services: ServiceDirectory) -> Self {
        Self { store, services }
    }

    /// Returns the underlying store for read paths.
    pub fn store(&self) -> &BookingStore {
        &self.store
    }

    /// Creates a booking for the actor's own account. Starts `PENDING`.
    ///
    /// Service name and price are frozen from the directory at creation.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        actor: Actor,
        pet_id: PetId,
        service_id: ServiceId,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Booking> {
        let service = self.services.get_bookable(service_id).await?;

        let now = Utc::now();
        let booking = Booking {
            id: BookingId::new(),
            user_id: actor.user_id,
            pet_id,
            service_id,
            service_name: service.name,
            price: service.price,
            scheduled_at,
            status: BookingStatus::Pending,
            provider_id: None,
            cancellation_reason: None,
            cancelled_at: None,
            previous_scheduled_at: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(booking.clone()).await;

        metrics::counter!("bookings_created_total").increment(1);
        tracing::info!(booking_id = %booking.id, service = %booking.service_name, "Booking created");
        Ok(booking)
    }

    /// Confirms a pending (or rescheduled) booking. Admin only.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, actor: Actor, booking_id: BookingId) -> Result<Booking> {
        if !actor.is_admin() {
            return Err(BookingError::Unauthorized(booking_id));
        }
        self.store
            .update(booking_id, |booking| {
                if !booking.status.can_confirm() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "confirm",
                    });
                }
                booking.status = BookingStatus::Confirmed;
                Ok(())
            })
            .await
    }

    /// Assigns a provider to a confirmed booking. Admin only.
    #[tracing::instrument(skip(self))]
    pub async fn assign_provider(
        &self,
        actor: Actor,
        booking_id: BookingId,
        provider_id: UserId,
    ) -> Result<Booking> {
        if !actor.is_admin() {
            return Err(BookingError::Unauthorized(booking_id));
        }
        self.store
            .update(booking_id, |booking| {
                if !booking.status.can_assign() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "assign a provider to",
                    });
                }
                booking.provider_id = Some(provider_id);
                booking.status = BookingStatus::Assigned;
                Ok(())
            })
            .await
    }

    /// Cancels a booking, recording the reason and timestamp.
    ///
    /// Owner only (or admin). Owners must cancel at least
    /// [`CANCELLATION_WINDOW_HOURS`] before the scheduled time.
    #[tracing::instrument(skip(self, reason))]
    pub async fn cancel(
        &self,
        actor: Actor,
        booking_id: BookingId,
        reason: impl Into<String>,
    ) -> Result<Booking> {
        let reason = reason.into();
        let now = Utc::now();
        self.store
            .update(booking_id, |booking| {
                if !actor.owns_or_admin(booking.user_id) {
                    return Err(BookingError::Unauthorized(booking_id));
                }
                if !booking.status.can_cancel() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "cancel",
                    });
                }
                let window = Duration::hours(CANCELLATION_WINDOW_HOURS);
                if !actor.is_admin() && booking.scheduled_at - now < window {
                    return Err(BookingError::CancellationWindowExpired {
                        hours: CANCELLATION_WINDOW_HOURS,
                    });
                }
                booking.status = BookingStatus::Cancelled;
                booking.cancellation_reason = Some(reason);
                booking.cancelled_at = Some(now);
                Ok(())
            })
            .await
    }

    /// Moves a booking to a new slot, keeping the old one for audit.
    ///
    /// Owner only (or admin). The booking lands in `RESCHEDULED` and must
    /// be confirmed again before a provider can take it.
    #[tracing::instrument(skip(self))]
    pub async fn reschedule(
        &self,
        actor: Actor,
        booking_id: BookingId,
        new_scheduled_at: DateTime<Utc>,
    ) -> Result<Booking> {
        self.store
            .update(booking_id, |booking| {
                if !actor.owns_or_admin(booking.user_id) {
                    return Err(BookingError::Unauthorized(booking_id));
                }
                if !booking.status.can_reschedule() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "reschedule",
                    });
                }
                booking.previous_scheduled_at = Some(booking.scheduled_at);
                booking.scheduled_at = new_scheduled_at;
                booking.status = BookingStatus::Rescheduled;
                Ok(())
            })
            .await
    }

    /// Applies a provider-submitted forward status.
    ///
    /// Only the assigned provider or an admin may call this. Any of the
    /// five forward statuses is accepted while the booking is live; no
    /// step-by-step ordering is enforced.
    #[tracing::instrument(skip(self))]
    pub async fn apply_provider_status(
        &self,
        actor: Actor,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking> {
        self.store
            .update(booking_id, |booking| {
                if !actor.is_admin() && !booking.is_assigned_provider(actor) {
                    return Err(BookingError::Unauthorized(booking_id));
                }
                if !status.is_provider_status() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "apply a non-provider status to",
                    });
                }
                if !booking.status.accepts_provider_status() {
                    return Err(BookingError::InvalidTransition {
                        current: booking.status,
                        action: "update",
                    });
                }
                booking.status = status;
                Ok(())
            })
            .await
    }
}
