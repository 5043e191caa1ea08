//! Availability API trait
//!
//! This module defines the `AvailabilityApi` trait the repositories and the
//! booking orchestrator depend on. The HTTP client implements it for the
//! real backend; tests substitute mocks.

use crate::api::types::{BookingRequest, Session, Slot};
use crate::error::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// The three portal endpoints the scheduler consumes
///
/// Implementations return canonical types only: all wire-shape tolerance
/// (see [`crate::api::types`]) is resolved before a value crosses this
/// boundary.
///
/// # Examples
///
/// ```no_run
/// use stuportal::api::{AvailabilityApi, PortalClient};
/// use stuportal::config::ApiConfig;
///
/// # async fn example() -> stuportal::error::Result<()> {
/// let client = PortalClient::new(&ApiConfig::default())?;
/// let slots = client.fetch_slots("teacher-1").await?;
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AvailabilityApi: Send + Sync {
    /// Fetch all availability slots published by one teacher
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Fetch` if the call or the decode fails
    async fn fetch_slots(&self, teacher_id: &str) -> Result<Vec<Slot>>;

    /// Fetch the current student's sessions, normalized to a flat list
    ///
    /// The endpoint is known to answer with a bare array, a wrapped
    /// `{sessions: [...]}` object, or a single session object; all three
    /// normalize to one list and any other shape normalizes to an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Fetch` if the call fails outright
    async fn fetch_sessions(&self, student_id: &str) -> Result<Vec<Session>>;

    /// Submit a booking for one slot
    ///
    /// # Errors
    ///
    /// Returns `PortalError::BookingFailed` carrying the server message when
    /// the booking is rejected, or `PortalError::Fetch` on transport failure
    async fn book_slot(&self, slot_id: &str, request: &BookingRequest) -> Result<Session>;
}
