//! Error types for stuportal
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for stuportal operations
///
/// This enum encompasses all possible errors that can occur while
/// loading availability, booking slots, evaluating the join gate,
/// and reading configuration.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or decode failure while reading slots or sessions
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Booking attempted without an authenticated student
    #[error("Not authenticated: a student id is required to book a slot")]
    NotAuthenticated,

    /// Booking attempted with a non-positive duration
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// A booking for this slot is already in flight from this client
    #[error("Booking already in progress for slot {0}")]
    BookingInProgress(String),

    /// The server rejected the booking; carries the server message when present
    #[error("Booking failed: {0}")]
    BookingFailed(String),

    /// The view was torn down before the booking response arrived;
    /// the response was not applied to the repositories
    #[error("Booking cancelled: the view was closed before the response arrived")]
    Cancelled,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for stuportal operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation. Callers that
/// need to branch on a specific failure downcast with
/// `err.downcast_ref::<PortalError>()`.
pub type Result<T> = anyhow::Result<T>;
