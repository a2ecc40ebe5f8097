//! Log/status agreement under a stream of updates.

use std::sync::Arc;

use booking::{BookingService, BookingStatus, BookingStore};
use catalog::{ServiceDirectory, ServiceRecord};
use chrono::{Duration, Utc};
use common::{Actor, Money, PetId, ServiceId, UserId};
use tracking::{FixedLocationProvider, TrackingBroadcaster};

#[tokio::test]
async fn status_equals_last_log_record_after_every_update() {
    let services = ServiceDirectory::new();
    let service_id = ServiceId::new();
    services
        .insert(ServiceRecord::new(
            service_id,
            "Vet Home Visit",
            Money::from_rupees(1500),
        ))
        .await;
    let bookings = BookingService::new(BookingStore::new(), services);

    let owner = Actor::customer(UserId::new());
    let admin = Actor::admin(UserId::new());
    let provider = Actor::provider(UserId::new());
    let booking = bookings
        .create(
            owner,
            PetId::new(),
            service_id,
            Utc::now() + Duration::hours(48),
        )
        .await
        .unwrap();
    bookings.confirm(admin, booking.id).await.unwrap();
    bookings
        .assign_provider(admin, booking.id, provider.user_id)
        .await
        .unwrap();

    let broadcaster = TrackingBroadcaster::new(
        bookings.clone(),
        Arc::new(FixedLocationProvider::default()),
    );

    // A stream of updates, including some the state machine rejects.
    let attempts = [
        (BookingStatus::EnRoute, true),
        (BookingStatus::Cancelled, false), // not a provider status
        (BookingStatus::Arrived, true),
        (BookingStatus::InProgress, true),
        (BookingStatus::Completed, true),
        (BookingStatus::EnRoute, false), // terminal
    ];

    let mut accepted = 0u64;
    for (status, should_succeed) in attempts {
        let result = broadcaster
            .post_update(provider, booking.id, status, None, None)
            .await;
        assert_eq!(result.is_ok(), should_succeed, "status {status}");
        if result.is_ok() {
            accepted += 1;
        }

        let history = broadcaster.history(owner, booking.id).await.unwrap();
        let current = broadcaster.booking(owner, booking.id).await.unwrap();
        assert_eq!(history.len() as u64, accepted);
        assert_eq!(current.status, history.last().unwrap().status);
        // Sequences are dense and ordered.
        for (i, record) in history.iter().enumerate() {
            assert_eq!(record.sequence, i as u64 + 1);
        }
    }
}
