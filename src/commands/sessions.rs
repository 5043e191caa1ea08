//! Booked-session listing command

use crate::config::Config;
use crate::error::Result;
use crate::scheduler::{can_join, countdown};
use colored::Colorize;
use prettytable::{format, Table};

/// List the student's booked sessions with their join state
pub async fn run_sessions(config: Config, teacher: String, student: Option<String>) -> Result<()> {
    let scheduler = super::build_scheduler(&config, &teacher, student)?;

    if let Err(err) = scheduler.refresh().await {
        println!("{}", format!("Failed to load availability: {}", err).red());
        return Ok(());
    }

    let now = chrono::Local::now().naive_local();
    let sessions = scheduler.sessions();

    if sessions.is_empty() {
        println!("{}", "No booked sessions.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Session".bold(),
        "Slot".bold(),
        "Starts".bold(),
        "Status".bold(),
        "Meeting".bold(),
        "Join".bold()
    ]);

    for session in &sessions {
        let starts = session
            .session_start
            .map(|s| s.format("%b %-d, %H:%M").to_string())
            .unwrap_or_else(|| "—".to_string());
        let meeting = session.meeting_id.as_deref().unwrap_or("—").to_string();

        // The link is only printed once the gate is open; before that the
        // column shows the countdown instead.
        let join = if can_join(session, now) {
            match &session.meeting_link {
                Some(link) => format!("{} {}", "live:".green().bold(), link),
                None => "—".to_string(),
            }
        } else {
            match countdown(session, now) {
                Some(remaining) => format!("locked, opens in {}", remaining)
                    .yellow()
                    .to_string(),
                None => "locked".yellow().to_string(),
            }
        };

        table.add_row(prettytable::row![
            session.id.cyan(),
            session.slot_id,
            starts,
            session.status,
            meeting,
            join
        ]);
    }

    println!();
    table.printstd();
    println!();
    Ok(())
}
