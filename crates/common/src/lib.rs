//! Shared types for the pet-care marketplace transaction engine.
//!
//! Everything here is deliberately dependency-light: typed identifiers,
//! paise-denominated money, and the explicit [`Actor`] identity that every
//! core operation receives instead of an ambient "current user".

pub mod actor;
pub mod money;
pub mod types;

pub use actor::{Actor, Role};
pub use money::Money;
pub use types::{BookingId, OrderId, PetId, ProductId, ServiceId, UserId};
