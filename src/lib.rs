//! stuportal - Student portal scheduling client library
//!
//! This library implements the availability/booking scheduler behind the
//! student portal: slot availability, the booking transition, session-to-
//! slot association, join-window gating, and the grouped/filtered view
//! projection.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: the portal endpoint seam (`AvailabilityApi`), its HTTP
//!   implementation, and the canonical wire types
//! - `scheduler`: repositories, booking orchestration, the join gate, and
//!   the view projection
//! - `config`: configuration loading and validation
//! - `error`: error types and result aliases
//! - `cli` / `commands`: the command-line front end
//!
//! All dates and times are zone-naive wall-clock values, matching the
//! backend's own convention; see `api::types` for the implications.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stuportal::api::PortalClient;
//! use stuportal::config::Config;
//! use stuportal::scheduler::{Scheduler, StudentContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     let api = Arc::new(PortalClient::new(&config.api)?);
//!     let scheduler = Scheduler::new(api, "teacher-1", StudentContext::new("student-1"));
//!     scheduler.refresh().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod scheduler;

// Re-export commonly used types
pub use api::{AvailabilityApi, PortalClient, Session, SessionStatus, Slot};
pub use config::Config;
pub use error::{PortalError, Result};
pub use scheduler::{Scheduler, StudentContext};
