//! The tracking broadcaster: append-only log plus live fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use booking::{Booking, BookingService, BookingStatus};
use chrono::Utc;
use common::{Actor, BookingId};
use tokio::sync::{Mutex, RwLock, broadcast};

use crate::error::Result;
use crate::live_status::LiveStatus;
use crate::location::LocationProvider;
use crate::update::{GeoPoint, TrackingUpdate};

/// Buffered events per booking channel. A subscriber that falls further
/// behind than this sees a `Lagged` error and must catch up via history.
const CHANNEL_CAPACITY: usize = 64;

/// Publishes booking tracking updates.
///
/// Every update runs through one serialized critical section: the booking
/// transition, the log append, and the broadcast happen together, so
/// `Booking.status` always equals the status of the last log record.
/// Publication is fire-and-forget; the log is the source of truth and
/// reconnecting clients read [`TrackingBroadcaster::history`].
#[derive(Clone)]
pub struct TrackingBroadcaster {
    bookings: BookingService,
    locations: Arc<dyn LocationProvider>,
    log: Arc<RwLock<HashMap<BookingId, Vec<TrackingUpdate>>>>,
    channels: Arc<RwLock<HashMap<BookingId, broadcast::Sender<TrackingUpdate>>>>,
    /// Serializes transition + append so no two updates interleave.
    write_gate: Arc<Mutex<()>>,
}

impl TrackingBroadcaster {
    /// Creates a broadcaster over the given booking service.
    pub fn new(bookings: BookingService, locations: Arc<dyn LocationProvider>) -> Self {
        Self {
            bookings,
            locations,
            log: Arc::new(RwLock::new(HashMap::new())),
            channels: Arc::new(RwLock::new(HashMap::new())),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Posts a provider status update for a booking.
    ///
    /// Authorizes the actor, applies the booking transition, appends the
    /// log record, and fans the event out to live subscribers. A rejected
    /// transition appends nothing. When no location is supplied the
    /// configured [`LocationProvider`] is consulted.
    #[tracing::instrument(skip(self, message, location))]
    pub async fn post_update(
        &self,
        actor: Actor,
        booking_id: BookingId,
        status: BookingStatus,
        message: Option<String>,
        location: Option<GeoPoint>,
    ) -> Result<TrackingUpdate> {
        let _gate = self.write_gate.lock().await;

        // Transition first: a rejected status must leave the log untouched.
        self.bookings
            .apply_provider_status(actor, booking_id, status)
            .await?;

        let location = match location {
            Some(point) => Some(point),
            None => self.locations.current_location(booking_id).await,
        };

        let mut log = self.log.write().await;
        let records = log.entry(booking_id).or_default();
        let update = TrackingUpdate {
            booking_id,
            sequence: records.len() as u64 + 1,
            status,
            message,
            location,
            updated_by: actor.user_id,
            created_at: Utc::now(),
        };
        records.push(update.clone());
        drop(log);

        // Fire-and-forget: a channel with no subscribers returns an error
        // we deliberately ignore.
        if let Some(tx) = self.channels.read().await.get(&booking_id) {
            let _ = tx.send(update.clone());
        }

        metrics::counter!("tracking_updates_total").increment(1);
        tracing::info!(
            booking_id = %booking_id,
            sequence = update.sequence,
            status = %status,
            "Tracking update posted"
        );
        Ok(update)
    }

    /// Returns the full ordered update log for a booking.
    ///
    /// The catch-up read for clients that connected after events fired or
    /// dropped their subscription.
    pub async fn history(&self, actor: Actor, booking_id: BookingId) -> Result<Vec<TrackingUpdate>> {
        self.bookings.store().get(actor, booking_id).await?;
        let log = self.log.read().await;
        Ok(log.get(&booking_id).cloned().unwrap_or_default())
    }

    /// Returns the live progress view for a booking.
    pub async fn live_status(&self, actor: Actor, booking_id: BookingId) -> Result<LiveStatus> {
        let booking = self.bookings.store().get(actor, booking_id).await?;
        Ok(LiveStatus::for_status(booking.status))
    }

    /// Returns the booking record itself, for handlers that need both the
    /// booking and its tracking state.
    pub async fn booking(&self, actor: Actor, booking_id: BookingId) -> Result<Booking> {
        Ok(self.bookings.store().get(actor, booking_id).await?)
    }

    /// Subscribes to live updates for a booking.
    ///
    /// Only events posted after this call are delivered; earlier ones come
    /// from [`TrackingBroadcaster::history`].
    pub async fn subscribe(
        &self,
        actor: Actor,
        booking_id: BookingId,
    ) -> Result<broadcast::Receiver<TrackingUpdate>> {
        self.bookings.store().get(actor, booking_id).await?;
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(booking_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        Ok(tx.subscribe())
    }
}
