//! Availability listing command

use crate::config::Config;
use crate::error::Result;
use crate::scheduler::{format_slot_duration, DateLabel, StatusFilter, ViewState};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use prettytable::{format, Table};

/// List a teacher's availability, grouped by date
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `teacher` - Teacher whose availability to list
/// * `student` - Optional student id; booked-by-you markers need it
/// * `filter` - Status filter (`all`, `available`, `booked`)
/// * `hide_booked` - Hide booked slots from the listing
/// * `date` - Restrict the listing to one date
pub async fn run_slots(
    config: Config,
    teacher: String,
    student: Option<String>,
    filter: String,
    hide_booked: bool,
    date: Option<NaiveDate>,
) -> Result<()> {
    let status: StatusFilter = filter
        .parse()
        .map_err(|e: String| crate::error::PortalError::Config(e))?;

    let scheduler = super::build_scheduler(&config, &teacher, student)?;

    if let Err(err) = scheduler.refresh().await {
        println!("{}", format!("Failed to load availability: {}", err).red());
        return Ok(());
    }

    let mut state = ViewState::default();
    state.filters.status = status;
    state.filters.show_booked = !hide_booked;
    state.filters.selected_date = date;

    let view = scheduler.project(&state);
    let today = Local::now().date_naive();

    println!();
    println!(
        "Availability for teacher {}: {} total, {} available, {} booked, {} days",
        teacher.cyan(),
        view.counts.total,
        view.counts.available.to_string().green(),
        view.counts.booked.to_string().red(),
        view.counts.days
    );

    if view.counts.total == 0 {
        println!("{}", "No sessions available. Check back later.".yellow());
        return Ok(());
    }
    if view.days.is_empty() {
        println!("{}", "No slots match the active filters.".yellow());
        return Ok(());
    }

    for day in &view.days {
        let label = match DateLabel::relative(day.date, today) {
            DateLabel::Today => " (today)",
            DateLabel::Tomorrow => " (tomorrow)",
            DateLabel::Other => "",
        };
        println!();
        println!(
            "{}{} — {} available · {} booked",
            day.date.format("%A, %B %-d, %Y").to_string().bold(),
            label,
            day.available,
            day.booked
        );

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
        table.add_row(prettytable::row![
            "Slot".bold(),
            "Time".bold(),
            "Length".bold(),
            "Status".bold()
        ]);

        for slot in &day.slots {
            let time = format!(
                "{} — {}",
                slot.start_time.format("%H:%M"),
                slot.end_time.format("%H:%M")
            );
            let status = if scheduler.session_for(&slot.id).is_some() {
                "your session".purple().to_string()
            } else if slot.is_booked {
                "booked".red().to_string()
            } else {
                "available".green().to_string()
            };
            table.add_row(prettytable::row![
                slot.id.cyan(),
                time,
                format_slot_duration(slot),
                status
            ]);
        }

        table.printstd();
    }

    println!();
    println!(
        "Use {} to reserve a slot.",
        "stuportal book --teacher <id> --slot <id> --duration <minutes>".cyan()
    );
    Ok(())
}
