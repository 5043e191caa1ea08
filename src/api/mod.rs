//! Portal API layer
//!
//! The trait seam ([`AvailabilityApi`]), the reqwest implementation
//! ([`PortalClient`]), and the canonical wire types. Everything above this
//! module works with canonical records only.

pub mod base;
pub mod client;
pub mod types;

pub use base::AvailabilityApi;
pub use client::PortalClient;
pub use types::{BookingRequest, Session, SessionStatus, Slot};

#[cfg(test)]
pub use base::MockAvailabilityApi;
