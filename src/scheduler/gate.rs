//! Join-window time gate
//!
//! A session's meeting link stays hidden until the session's scheduled
//! start instant, then goes live. [`can_join`] and [`countdown`] are pure
//! functions of the session and a supplied "now"; [`GateTicker`] re-runs
//! them on a fixed tick so the displayed state is stale by at most one tick
//! period. Nothing is cached between ticks: every evaluation starts from
//! scratch, so the gate can never get stuck open or closed by a stale flag.

use crate::api::Session;
use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// True when the session's meeting link may be exposed
///
/// The gate opens at `session_start` exactly (`<=`), and only when the
/// backend has assigned a meeting link; without a link the session is not
/// joinable regardless of time.
pub fn can_join(session: &Session, now: NaiveDateTime) -> bool {
    if session.meeting_link.is_none() {
        return false;
    }
    match session.session_start {
        Some(start) => start <= now,
        None => false,
    }
}

/// Whole minutes until the gate opens, ceiling-rounded
///
/// `None` once [`can_join`] is true, when `session_start` is absent, or
/// when the start has already passed without the gate opening (no link).
pub fn countdown(session: &Session, now: NaiveDateTime) -> Option<Countdown> {
    if can_join(session, now) {
        return None;
    }
    let start = session.session_start?;
    let seconds = (start - now).num_seconds();
    if seconds <= 0 {
        return None;
    }
    Some(Countdown {
        minutes: (seconds + 59) / 60,
    })
}

/// Time remaining until a session unlocks, in whole minutes
///
/// Displays as `"45m"` below one hour, else `"2h"` or `"1h 30m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub minutes: i64,
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.minutes < 60 {
            return write!(f, "{}m", self.minutes);
        }
        let hours = self.minutes / 60;
        let minutes = self.minutes % 60;
        if minutes > 0 {
            write!(f, "{}h {}m", hours, minutes)
        } else {
            write!(f, "{}h", hours)
        }
    }
}

/// One session's gate state at a given instant
#[derive(Debug, Clone)]
pub struct GateStatus {
    pub slot_id: String,
    pub session_id: String,
    pub can_join: bool,
    pub countdown: Option<Countdown>,
}

/// Evaluate the gate for every session at one instant
pub fn evaluate_all(sessions: &[Session], now: NaiveDateTime) -> Vec<GateStatus> {
    sessions
        .iter()
        .map(|session| GateStatus {
            slot_id: session.slot_id.clone(),
            session_id: session.id.clone(),
            can_join: can_join(session, now),
            countdown: countdown(session, now),
        })
        .collect()
}

/// Recurring gate re-evaluation as a scoped resource
///
/// Owns the background tick task and its cancellation token. The token is
/// cancelled on [`GateTicker::cancel`], [`GateTicker::shutdown`], and drop,
/// so a discarded ticker can never keep calling into torn-down state.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use stuportal::scheduler::gate::GateTicker;
///
/// # async fn example() {
/// let ticker = GateTicker::spawn(Duration::from_secs(30), |now| {
///     println!("re-evaluating at {}", now);
/// });
/// // ... view is torn down:
/// ticker.shutdown().await;
/// # }
/// ```
pub struct GateTicker {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl GateTicker {
    /// Start ticking at a fixed period
    ///
    /// The callback fires immediately and then once per period with a fresh
    /// wall-clock "now". Missed ticks are skipped rather than bursted.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(NaiveDateTime) + Send + 'static,
    {
        let token = CancellationToken::new();
        let tick_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = tick_token.cancelled() => {
                        tracing::debug!("Gate ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        on_tick(Local::now().naive_local());
                    }
                }
            }
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Stop ticking without waiting for the task to finish
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Stop ticking and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for GateTicker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
