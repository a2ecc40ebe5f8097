//! The tracking update record.

use booking::BookingStatus;
use chrono::{DateTime, Utc};
use common::{BookingId, UserId};
use serde::{Deserialize, Serialize};

/// A GPS point reported alongside a tracking update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl GeoPoint {
    /// Creates a point with no heading or speed.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            heading: None,
            speed: None,
        }
    }
}

/// One append-only status/location event tied to a booking.
///
/// `sequence` starts at 1 and increases by one per update on the same
/// booking; the log is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingUpdate {
    pub booking_id: BookingId,
    pub sequence: u64,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
}
