//! Slot repository
//!
//! Holds the availability slots for one teacher. A load either replaces the
//! whole set or leaves the repository empty with an error flag; there is no
//! partial or stale state. The only mutation between loads is the booked
//! flag flip applied after a confirmed booking.

use crate::api::{AvailabilityApi, Slot};
use crate::error::{PortalError, Result};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct SlotState {
    slots: Vec<Slot>,
    loaded: bool,
    load_error: Option<String>,
}

/// The set of availability slots published by one teacher
pub struct SlotRepository {
    api: Arc<dyn AvailabilityApi>,
    teacher_id: String,
    state: RwLock<SlotState>,
}

impl SlotRepository {
    /// Create an empty repository for one teacher
    pub fn new(api: Arc<dyn AvailabilityApi>, teacher_id: impl Into<String>) -> Self {
        Self {
            api,
            teacher_id: teacher_id.into(),
            state: RwLock::new(SlotState::default()),
        }
    }

    /// The teacher whose slots this repository holds
    pub fn teacher_id(&self) -> &str {
        &self.teacher_id
    }

    /// Fetch the teacher's slots, replacing the current set
    ///
    /// On failure the repository is emptied and the error message retained
    /// for display ([`Self::load_error`]); no stale data survives a failed
    /// load.
    ///
    /// # Returns
    ///
    /// The number of slots loaded
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Fetch` when the fetch or decode fails
    pub async fn load(&self) -> Result<usize> {
        match self.api.fetch_slots(&self.teacher_id).await {
            Ok(mut slots) => {
                // The availability endpoint does not echo the teacher id;
                // stamp it from the load context.
                for slot in &mut slots {
                    slot.teacher_id = self.teacher_id.clone();
                }
                let count = slots.len();

                let mut state = self.state.write().map_err(|_| {
                    PortalError::Fetch("slot repository lock poisoned".to_string())
                })?;
                state.slots = slots;
                state.loaded = true;
                state.load_error = None;

                tracing::debug!("Slot repository loaded {} slots", count);
                Ok(count)
            }
            Err(err) => {
                let message = err.to_string();
                if let Ok(mut state) = self.state.write() {
                    state.slots.clear();
                    state.loaded = false;
                    state.load_error = Some(message);
                }
                Err(err)
            }
        }
    }

    /// Flip one slot's booked flag to true
    ///
    /// A no-op (logged) when the slot id is not present; never panics.
    pub fn mark_booked(&self, slot_id: &str) {
        if let Ok(mut state) = self.state.write() {
            match state.slots.iter_mut().find(|s| s.id == slot_id) {
                Some(slot) => slot.is_booked = true,
                None => tracing::debug!("mark_booked: slot {} not present, ignoring", slot_id),
            }
        }
    }

    /// Snapshot of all slots in load order
    pub fn slots(&self) -> Vec<Slot> {
        self.state
            .read()
            .map(|state| state.slots.clone())
            .unwrap_or_default()
    }

    /// Look up one slot by id
    pub fn get(&self, slot_id: &str) -> Option<Slot> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.slots.iter().find(|s| s.id == slot_id).cloned())
    }

    /// Whether the last load succeeded
    pub fn is_loaded(&self) -> bool {
        self.state.read().map(|state| state.loaded).unwrap_or(false)
    }

    /// The error message from the last failed load, if any
    pub fn load_error(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.load_error.clone())
    }
}
