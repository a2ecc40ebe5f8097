//! Provider location lookup.

use async_trait::async_trait;
use common::BookingId;

use crate::update::GeoPoint;

/// Supplies the current provider location for a booking when an update
/// arrives without one.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns the current location for the booking's provider, if known.
    async fn current_location(&self, booking_id: BookingId) -> Option<GeoPoint>;
}

/// A [`LocationProvider`] that always reports the same point.
///
/// Used as the default source and as a deterministic fixture in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    point: GeoPoint,
}

impl FixedLocationProvider {
    /// Creates a provider pinned to the given point.
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

impl Default for FixedLocationProvider {
    fn default() -> Self {
        // Mumbai city centre.
        Self::new(GeoPoint::new(19.0760, 72.8777))
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self, _booking_id: BookingId) -> Option<GeoPoint> {
        Some(self.point)
    }
}
