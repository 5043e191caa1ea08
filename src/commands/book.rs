//! Slot booking command

use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::scheduler::{can_join, countdown};
use colored::Colorize;

/// Book one availability slot
pub async fn run_book(
    config: Config,
    teacher: String,
    student: Option<String>,
    slot_id: String,
    duration: u32,
) -> Result<()> {
    let scheduler = super::build_scheduler(&config, &teacher, student)?;

    if let Err(err) = scheduler.refresh().await {
        println!("{}", format!("Failed to load availability: {}", err).red());
        return Ok(());
    }

    match scheduler.book(&slot_id, duration).await {
        Ok(session) => {
            println!();
            println!(
                "{} slot {} as session {}",
                "Booked".green().bold(),
                slot_id.cyan(),
                session.id.cyan()
            );
            if let Some(start) = session.session_start {
                println!("Starts {}", start.format("%A, %B %-d at %H:%M"));
            }
            if let Some(meeting_id) = &session.meeting_id {
                println!("Meeting ID: {}", meeting_id);
            }

            let now = chrono::Local::now().naive_local();
            if can_join(&session, now) {
                if let Some(link) = &session.meeting_link {
                    println!("{} {}", "Session is live — join now:".green(), link);
                }
            } else if let Some(remaining) = countdown(&session, now) {
                println!("Meeting link unlocks in {}", remaining.to_string().yellow());
            }
            println!();
        }
        Err(err) => {
            // Booking failures are displayable states, not crashes; show the
            // reason (the server message verbatim for rejections) and exit
            // cleanly.
            let message = match err.downcast_ref::<PortalError>() {
                Some(portal_err) => portal_err.to_string(),
                None => err.to_string(),
            };
            println!("{}", message.red());
        }
    }

    Ok(())
}
