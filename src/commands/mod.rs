//! Command handlers for the stuportal CLI
//!
//! Each submodule implements one subcommand against the scheduler; shared
//! construction lives here.

pub mod book;
pub mod sessions;
pub mod slots;
pub mod watch;

use crate::api::PortalClient;
use crate::config::Config;
use crate::error::Result;
use crate::scheduler::{Scheduler, StudentContext};
use std::sync::Arc;

/// Build a scheduler for one teacher from the loaded configuration
pub(crate) fn build_scheduler(
    config: &Config,
    teacher_id: &str,
    student: Option<String>,
) -> Result<Scheduler> {
    let api = Arc::new(PortalClient::new(&config.api)?);
    let context = match student {
        Some(id) => StudentContext::new(id),
        None => StudentContext::anonymous(),
    };
    Ok(Scheduler::new(api, teacher_id, context))
}
