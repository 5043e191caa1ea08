//! Wire types for the portal availability API
//!
//! This module defines the canonical `Slot` and `Session` records plus the
//! request/response structures for the booking endpoint. All tolerance for
//! wire-shape variance lives here: flexible time formats, number-or-string
//! durations, and the three shapes the session listing endpoint is known to
//! return. Nothing past this module ever sees a non-canonical shape.
//!
//! All dates and times are zone-naive wall-clock values. Incoming instants
//! keep the clock digits as written and discard any UTC offset; outgoing
//! instants are formatted with a literal `Z`. If the teacher and student are
//! in different timezones, join-time correctness is ambiguous; this mirrors
//! the backend's own convention and is a known limitation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// An availability window offered by one teacher
///
/// Slots arrive from `GET /availability/{teacherId}`. The wire record does
/// not carry the teacher id; the slot repository stamps it from the load
/// context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Opaque slot identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Owning teacher id (stamped at load time, not on the wire)
    #[serde(default)]
    pub teacher_id: String,

    /// Calendar date of the slot (local wall-clock)
    pub date: NaiveDate,

    /// Start of the window, wall-clock time of day
    #[serde(with = "wall_clock::time")]
    pub start_time: NaiveTime,

    /// End of the window, wall-clock time of day
    #[serde(with = "wall_clock::time")]
    pub end_time: NaiveTime,

    /// Whether this slot has been booked
    #[serde(default)]
    pub is_booked: bool,
}

impl Slot {
    /// The instant this slot begins: slot date + start time, zone-naive
    pub fn starts_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.start_time)
    }

    /// Length of the window in whole minutes (end minus start)
    ///
    /// Negative if the slot's times are inverted; display code treats that
    /// the same as missing.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Display-only session state reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Confirmed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Confirmed => "confirmed",
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Pending
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Unknown status strings decode as pending rather than failing the record.
impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "confirmed" => SessionStatus::Confirmed,
            _ => SessionStatus::Pending,
        })
    }
}

/// A confirmed booking binding one student to one slot
///
/// Created server-side in response to a successful booking call; never
/// mutated client-side after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// The slot this session was booked against (one-to-one per student)
    pub slot_id: String,

    #[serde(default)]
    pub student_id: String,

    #[serde(default)]
    pub teacher_id: String,

    /// Requested length in minutes; the wire value may be a number or a string
    #[serde(default, deserialize_with = "minutes_lenient")]
    pub duration: u32,

    /// Scheduled start instant; absent until the backend assigns it
    #[serde(default, with = "wall_clock::instant_opt")]
    pub session_start: Option<NaiveDateTime>,

    #[serde(default)]
    pub status: SessionStatus,

    /// Meeting identifier; absent until the backend assigns it
    #[serde(default)]
    pub meeting_id: Option<String>,

    /// Meeting URL; absent until the backend assigns it. The join gate
    /// treats an absent link as not joinable regardless of time.
    #[serde(default)]
    pub meeting_link: Option<String>,
}

/// Body of `PUT /availability/book/{slotId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub student_id: String,
    pub teacher_id: String,
    pub duration: u32,

    /// The slot's start instant, formatted as an ISO-8601 instant
    #[serde(with = "wall_clock::instant")]
    pub requested_time: NaiveDateTime,
}

/// Successful booking response envelope: `{ "session": { ... } }`
///
/// The field is optional so a malformed 2xx confirmation decodes instead of
/// erroring; the client surfaces the missing session as a booking failure.
#[derive(Debug, Deserialize)]
pub struct BookingConfirmation {
    #[serde(default)]
    pub session: Option<Session>,
}

/// Error body the booking endpoint returns on rejection
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// The session listing endpoint returns one of three shapes: a bare array,
/// an object wrapping a `sessions` array, or a single session object.
/// Anything else normalizes to an empty list rather than failing the view.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SessionsPayload {
    Sessions(Vec<Session>),
    Wrapped { sessions: Vec<Session> },
    Single(Session),
    Other(serde_json::Value),
}

impl SessionsPayload {
    /// Collapse the payload to the one canonical shape
    pub(crate) fn normalize(self) -> Vec<Session> {
        match self {
            SessionsPayload::Sessions(sessions) => sessions,
            SessionsPayload::Wrapped { sessions } => sessions,
            SessionsPayload::Single(session) => vec![session],
            SessionsPayload::Other(value) => {
                tracing::warn!(
                    "Unexpected session response shape, treating as empty: {}",
                    value
                );
                Vec::new()
            }
        }
    }
}

/// Deserialize minutes from either a JSON number or a numeric string
fn minutes_lenient<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid duration: {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid duration: {:?}", s))),
        other => Err(serde::de::Error::custom(format!(
            "invalid duration: {}",
            other
        ))),
    }
}

/// Serde helpers for zone-naive wall-clock values
pub mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};

    const INSTANT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

    /// Parse an ISO-8601 instant keeping the written clock digits
    ///
    /// An explicit offset is discarded in favor of the wall-clock fields as
    /// written; a bare datetime is taken as-is.
    pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.naive_local());
        }
        INSTANT_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    }

    /// Format an instant the way the backend expects: `%Y-%m-%dT%H:%M:%SZ`
    pub fn format_instant(value: &NaiveDateTime) -> String {
        value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// `HH:MM[:SS]` wall-clock times
    pub mod time {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

        pub fn serialize<S>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&value.format("%H:%M").to_string())
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = String::deserialize(deserializer)?;
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(&value, fmt).ok())
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {:?}", value)))
        }
    }

    /// Required zone-naive instants
    pub mod instant {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&super::format_instant(value))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = String::deserialize(deserializer)?;
            super::parse_instant(&value)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid instant: {:?}", value)))
        }
    }

    /// Optional zone-naive instants
    pub mod instant_opt {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(instant) => serializer.serialize_str(&super::format_instant(instant)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<String>::deserialize(deserializer)?;
            match value {
                Some(text) => super::parse_instant(&text)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid instant: {:?}", text))),
                None => Ok(None),
            }
        }
    }
}
