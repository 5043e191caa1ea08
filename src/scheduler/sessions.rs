//! Session repository
//!
//! Holds the current student's sessions, keyed by the slot they were booked
//! against. The slot association is the whole point of a session, so the
//! repository is only loaded after the slot repository has loaded, and the
//! one-session-per-slot invariant is checked at insert time: a duplicate
//! keeps the first session and is logged as a data-integrity condition, not
//! crashed on.

use crate::api::{AvailabilityApi, Session};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct SessionState {
    by_slot: HashMap<String, Session>,
    order: Vec<String>,
}

impl SessionState {
    fn insert(&mut self, session: Session) -> bool {
        if self.by_slot.contains_key(&session.slot_id) {
            tracing::warn!(
                "Duplicate session for slot {} (session {}), keeping the first",
                session.slot_id,
                session.id
            );
            return false;
        }
        self.order.push(session.slot_id.clone());
        self.by_slot.insert(session.slot_id.clone(), session);
        true
    }
}

/// The current student's sessions, keyed by slot id
pub struct SessionRepository {
    api: Arc<dyn AvailabilityApi>,
    state: RwLock<SessionState>,
}

impl SessionRepository {
    /// Create an empty repository
    pub fn new(api: Arc<dyn AvailabilityApi>) -> Self {
        Self {
            api,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Fetch the student's sessions, replacing the current set
    ///
    /// Callers must sequence this after a successful slot load; sessions
    /// referencing a slot id not in `known_slot_ids` are kept but logged,
    /// since they cannot be displayed against their slot.
    ///
    /// # Returns
    ///
    /// The number of sessions retained
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Fetch` when the fetch fails outright; the
    /// repository is emptied in that case so the caller can degrade to a
    /// sessionless view
    pub async fn load(&self, student_id: &str, known_slot_ids: &[String]) -> Result<usize> {
        match self.api.fetch_sessions(student_id).await {
            Ok(sessions) => {
                let mut state = SessionState::default();
                for session in sessions {
                    if !known_slot_ids.iter().any(|id| *id == session.slot_id) {
                        tracing::debug!(
                            "Session {} references unknown slot {}",
                            session.id,
                            session.slot_id
                        );
                    }
                    state.insert(session);
                }
                let count = state.order.len();

                if let Ok(mut guard) = self.state.write() {
                    *guard = state;
                }

                tracing::debug!("Session repository loaded {} sessions", count);
                Ok(count)
            }
            Err(err) => {
                if let Ok(mut guard) = self.state.write() {
                    *guard = SessionState::default();
                }
                Err(err)
            }
        }
    }

    /// Append one session after a successful booking
    ///
    /// Returns false (and logs) when a session for the same slot already
    /// exists; the first session wins.
    pub fn add(&self, session: Session) -> bool {
        self.state
            .write()
            .map(|mut state| state.insert(session))
            .unwrap_or(false)
    }

    /// The session booked against one slot, if any
    pub fn find(&self, slot_id: &str) -> Option<Session> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.by_slot.get(slot_id).cloned())
    }

    /// Snapshot of all sessions in insertion order
    pub fn sessions(&self) -> Vec<Session> {
        self.state
            .read()
            .map(|state| {
                state
                    .order
                    .iter()
                    .filter_map(|slot_id| state.by_slot.get(slot_id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of sessions held
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.order.len()).unwrap_or(0)
    }

    /// Whether the repository holds no sessions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
