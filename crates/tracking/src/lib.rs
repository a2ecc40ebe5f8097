//! Live booking tracking: an append-only update log with broadcast fan-out.
//!
//! The persisted log is the source of truth. Live publication is
//! fire-and-forget to currently-connected subscribers; clients that connect
//! late (or drop and reconnect) catch up through [`TrackingBroadcaster::history`].

pub mod broadcaster;
pub mod error;
pub mod live_status;
pub mod location;
pub mod update;

pub use broadcaster::TrackingBroadcaster;
pub use error::TrackingError;
pub use live_status::{LiveStatus, eta_minutes, progress_index};
pub use location::{FixedLocationProvider, LocationProvider};
pub use update::{GeoPoint, TrackingUpdate};
