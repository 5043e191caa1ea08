//! Slot/session scheduling engine
//!
//! This module wires the pieces together: the slot and session
//! repositories, the booking orchestrator, the join-gate evaluator, and the
//! view projection. [`Scheduler`] is the composition root one view works
//! against; everything it depends on is passed in at construction, with no
//! ambient or module-level state.

pub mod booking;
pub mod gate;
pub mod sessions;
pub mod slots;
pub mod view;

pub use booking::BookingOrchestrator;
pub use gate::{can_join, countdown, evaluate_all, Countdown, GateStatus, GateTicker};
pub use sessions::SessionRepository;
pub use slots::SlotRepository;
pub use view::{
    format_slot_duration, group_by_date, project, sorted_date_keys, DateLabel, DayGroup,
    SlotCounts, StatusFilter, ViewFilters, ViewProjection, ViewState,
};

use crate::api::{AvailabilityApi, Session, Slot};
use crate::error::Result;
use anyhow::bail;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Who is using the view
///
/// Constructed by the caller and handed to the scheduler; an anonymous
/// context can browse availability but any booking fails fast with
/// `NotAuthenticated`.
#[derive(Debug, Clone, Default)]
pub struct StudentContext {
    student_id: Option<String>,
}

impl StudentContext {
    /// Context for an authenticated student
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
        }
    }

    /// Context for a visitor who has not logged in
    pub fn anonymous() -> Self {
        Self { student_id: None }
    }

    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.student_id.is_some()
    }
}

/// One teacher's availability view: repositories, booking, gating
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use stuportal::api::PortalClient;
/// use stuportal::config::ApiConfig;
/// use stuportal::scheduler::{Scheduler, StudentContext};
///
/// # async fn example() -> stuportal::error::Result<()> {
/// let api = Arc::new(PortalClient::new(&ApiConfig::default())?);
/// let scheduler = Scheduler::new(api, "teacher-1", StudentContext::new("student-1"));
/// scheduler.refresh().await?;
/// let session = scheduler.book("slot-1", 15).await?;
/// println!("booked session {}", session.id);
/// scheduler.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    student: StudentContext,
    slots: SlotRepository,
    sessions: SessionRepository,
    booking: BookingOrchestrator,
    liveness: CancellationToken,
}

impl Scheduler {
    /// Create a scheduler for one teacher's availability
    pub fn new(
        api: Arc<dyn AvailabilityApi>,
        teacher_id: impl Into<String>,
        student: StudentContext,
    ) -> Self {
        let liveness = CancellationToken::new();
        Self {
            student,
            slots: SlotRepository::new(Arc::clone(&api), teacher_id),
            sessions: SessionRepository::new(Arc::clone(&api)),
            booking: BookingOrchestrator::new(api, liveness.clone()),
            liveness,
        }
    }

    /// Reload both repositories
    ///
    /// The session fetch runs only after the slot fetch has succeeded and
    /// returned at least one slot; a session is only meaningful in relation
    /// to its slot. A session fetch failure degrades to an empty session set
    /// with a warning; only the slot fetch failure is surfaced.
    ///
    /// # Returns
    ///
    /// The number of slots loaded
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Fetch` when the slot fetch fails; the slot
    /// repository is left empty with its error flag set
    pub async fn refresh(&self) -> Result<usize> {
        let count = self.slots.load().await?;

        if count == 0 {
            tracing::debug!("No slots published, skipping session fetch");
            return Ok(0);
        }

        if let Some(student_id) = self.student.student_id() {
            let known: Vec<String> = self.slots.slots().iter().map(|s| s.id.clone()).collect();
            if let Err(err) = self.sessions.load(student_id, &known).await {
                tracing::warn!("Session fetch failed, continuing without sessions: {}", err);
            }
        }

        Ok(count)
    }

    /// Book one slot by id
    ///
    /// # Errors
    ///
    /// Fails when the slot id is unknown, plus every failure mode of
    /// [`BookingOrchestrator::book`]
    pub async fn book(&self, slot_id: &str, duration_minutes: u32) -> Result<Session> {
        let Some(slot) = self.slots.get(slot_id) else {
            bail!("slot {} is not in the loaded availability", slot_id);
        };

        self.booking
            .book(&slot, &self.student, duration_minutes, &self.slots, &self.sessions)
            .await
    }

    /// Tear the view down: in-flight booking confirmations are discarded
    /// from this point on
    pub fn shutdown(&self) {
        self.liveness.cancel();
    }

    pub fn is_live(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    pub fn student(&self) -> &StudentContext {
        &self.student
    }

    pub fn teacher_id(&self) -> &str {
        self.slots.teacher_id()
    }

    /// Snapshot of the loaded slots
    pub fn slots(&self) -> Vec<Slot> {
        self.slots.slots()
    }

    /// The error message from the last failed slot load, if any
    pub fn slot_error(&self) -> Option<String> {
        self.slots.load_error()
    }

    /// Snapshot of the student's sessions
    pub fn sessions(&self) -> Vec<Session> {
        self.sessions.sessions()
    }

    /// The session booked against one slot, if any
    pub fn session_for(&self, slot_id: &str) -> Option<Session> {
        self.sessions.find(slot_id)
    }

    /// Whether a booking for this slot is currently in flight
    pub fn is_booking(&self, slot_id: &str) -> bool {
        self.booking.is_in_flight(slot_id)
    }

    /// Project the current slots through a filter state
    pub fn project(&self, state: &ViewState) -> ViewProjection {
        view::project(&self.slots.slots(), state)
    }

    /// Evaluate the join gate for every session at one instant
    pub fn gate_statuses(&self, now: NaiveDateTime) -> Vec<GateStatus> {
        gate::evaluate_all(&self.sessions.sessions(), now)
    }
}
