//! Booking orchestrator
//!
//! Validates a booking request, submits it, and applies the confirmed
//! session to both repositories so the view reflects the post-booking state
//! without a refetch. Two rules hold on every path:
//!
//! - at most one booking is in flight per slot id; the marker is held by an
//!   RAII guard so it clears on success, failure, and panic alike
//! - nothing is mutated before server confirmation, and a confirmation that
//!   arrives after the view's liveness token is cancelled is not applied

use crate::api::{AvailabilityApi, BookingRequest, Session, Slot};
use crate::error::{PortalError, Result};
use crate::scheduler::sessions::SessionRepository;
use crate::scheduler::slots::SlotRepository;
use crate::scheduler::StudentContext;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Marker guard for one in-flight booking
///
/// Dropping the guard removes the slot id from the in-flight set, which is
/// the `finally` path: it runs however the booking attempt ends.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    slot_id: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<String>>>, slot_id: &str) -> Option<Self> {
        let mut markers = set.lock().ok()?;
        if !markers.insert(slot_id.to_string()) {
            return None;
        }
        drop(markers);
        Some(Self {
            set: Arc::clone(set),
            slot_id: slot_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut markers) = self.set.lock() {
            markers.remove(&self.slot_id);
        }
    }
}

/// Validates, submits, and applies bookings
pub struct BookingOrchestrator {
    api: Arc<dyn AvailabilityApi>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    liveness: CancellationToken,
}

impl BookingOrchestrator {
    /// Create an orchestrator bound to a view's liveness token
    ///
    /// Once `liveness` is cancelled, responses that are still in flight are
    /// discarded instead of being applied to the repositories.
    pub fn new(api: Arc<dyn AvailabilityApi>, liveness: CancellationToken) -> Self {
        Self {
            api,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            liveness,
        }
    }

    /// Whether a booking for this slot is currently in flight
    pub fn is_in_flight(&self, slot_id: &str) -> bool {
        self.in_flight
            .lock()
            .map(|markers| markers.contains(slot_id))
            .unwrap_or(false)
    }

    /// Book one slot for the student
    ///
    /// Preconditions fail fast, before any network call: the student context
    /// must carry an id (`NotAuthenticated`) and the duration must be
    /// positive (`InvalidDuration`). A second call for a slot whose booking
    /// is still in flight fails with `BookingInProgress` without issuing a
    /// request.
    ///
    /// On success the returned session is inserted into the session
    /// repository and the slot's booked flag is flipped, together; on any
    /// failure both repositories are left untouched.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, `InvalidDuration`, `BookingInProgress`,
    /// `BookingFailed` (server rejection, message verbatim when present),
    /// `Cancelled` (view torn down before the response arrived), or
    /// `Fetch` on transport failure
    pub async fn book(
        &self,
        slot: &Slot,
        student: &StudentContext,
        duration_minutes: u32,
        slots: &SlotRepository,
        sessions: &SessionRepository,
    ) -> Result<Session> {
        let student_id = match student.student_id() {
            Some(id) => id.to_string(),
            None => return Err(PortalError::NotAuthenticated.into()),
        };

        if duration_minutes == 0 {
            return Err(PortalError::InvalidDuration(
                "duration must be a positive number of minutes".to_string(),
            )
            .into());
        }

        let _guard = match InFlightGuard::acquire(&self.in_flight, &slot.id) {
            Some(guard) => guard,
            None => return Err(PortalError::BookingInProgress(slot.id.clone()).into()),
        };

        let request = BookingRequest {
            student_id,
            teacher_id: slot.teacher_id.clone(),
            duration: duration_minutes,
            requested_time: slot.starts_at(),
        };

        tracing::info!(
            "Booking slot {} at {} for {}m",
            slot.id,
            request.requested_time,
            duration_minutes
        );

        let session = self.api.book_slot(&slot.id, &request).await?;

        if self.liveness.is_cancelled() {
            tracing::warn!(
                "Discarding booking confirmation for slot {}: view was torn down",
                slot.id
            );
            return Err(PortalError::Cancelled.into());
        }

        // The session insert and the slot flip must land together.
        sessions.add(session.clone());
        slots.mark_booked(&slot.id);

        Ok(session)
    }
}
