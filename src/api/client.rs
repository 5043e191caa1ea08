//! HTTP client for the portal availability API
//!
//! This module implements [`AvailabilityApi`] against the real backend
//! using `reqwest`. Status handling and body decoding happen here so the
//! rest of the crate only ever sees canonical records or `PortalError`s.

use crate::api::base::AvailabilityApi;
use crate::api::types::{
    ApiErrorBody, BookingConfirmation, BookingRequest, Session, SessionsPayload, Slot,
};
use crate::config::ApiConfig;
use crate::error::{PortalError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Portal API client
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
/// println!("{} slots", slots.len());
/// # Ok(())
/// # }
/// ```
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    /// Create a new portal client
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration with base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("stuportal/0.2.0")
            .build()
            .map_err(|e| PortalError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized portal client: base_url={}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AvailabilityApi for PortalClient {
    async fn fetch_slots(&self, teacher_id: &str) -> Result<Vec<Slot>> {
        let url = format!("{}/availability/{}", self.base_url, teacher_id);
        tracing::debug!("Fetching slots: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Slot fetch failed: {}", e);
            PortalError::Fetch(format!("Failed to load availability slots: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Slot endpoint returned {}: {}", status, body);
            return Err(PortalError::Fetch(format!(
                "Slot endpoint returned {}",
                status
            ))
            .into());
        }

        let slots: Vec<Slot> = response.json().await.map_err(|e| {
            tracing::error!("Failed to decode slot response: {}", e);
            PortalError::Fetch(format!("Failed to decode slot response: {}", e))
        })?;

        tracing::debug!("Fetched {} slots for teacher {}", slots.len(), teacher_id);
        Ok(slots)
    }

    async fn fetch_sessions(&self, student_id: &str) -> Result<Vec<Session>> {
        let url = format!("{}/availability/student/{}", self.base_url, student_id);
        tracing::debug!("Fetching sessions: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Session fetch failed: {}", e);
            PortalError::Fetch(format!("Failed to load sessions: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Session endpoint returned {}: {}", status, body);
            return Err(PortalError::Fetch(format!(
                "Session endpoint returned {}",
                status
            ))
            .into());
        }

        let payload: SessionsPayload = response.json().await.map_err(|e| {
            tracing::warn!("Failed to decode session response: {}", e);
            PortalError::Fetch(format!("Failed to decode session response: {}", e))
        })?;

        let sessions = payload.normalize();
        tracing::debug!(
            "Fetched {} sessions for student {}",
            sessions.len(),
            student_id
        );
        Ok(sessions)
    }

    async fn book_slot(&self, slot_id: &str, request: &BookingRequest) -> Result<Session> {
        let url = format!("{}/availability/book/{}", self.base_url, slot_id);
        tracing::debug!(
            "Booking slot {}: student={}, duration={}m",
            slot_id,
            request.student_id,
            request.duration
        );

        let response = self
            .client
            .put(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Booking request failed: {}", e);
                PortalError::Fetch(format!("Booking request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            // The rejection body may carry a `{message}` meant for the user;
            // surface it verbatim when present.
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Failed to book slot".to_string());
            tracing::warn!("Booking rejected ({}): {}", status, message);
            return Err(PortalError::BookingFailed(message).into());
        }

        let confirmation: BookingConfirmation = response.json().await.map_err(|e| {
            tracing::error!("Failed to decode booking confirmation: {}", e);
            PortalError::Fetch(format!("Failed to decode booking confirmation: {}", e))
        })?;

        match confirmation.session {
            Some(session) => {
                tracing::info!("Booked slot {} as session {}", slot_id, session.id);
                Ok(session)
            }
            None => {
                tracing::error!("Booking confirmation for slot {} had no session", slot_id);
                Err(PortalError::BookingFailed(
                    "booking response did not include a session".to_string(),
                )
                .into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PortalClient::new(&ApiConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:9090/api/".to_string(),
            ..Default::default()
        };
        let client = PortalClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9090/api");
    }
}
