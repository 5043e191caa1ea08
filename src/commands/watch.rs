//! Join-gate watch command
//!
//! Keeps the scheduler's gate evaluation running on its tick and reports
//! when a session's meeting link unlocks. Runs until Ctrl-C; the ticker is
//! shut down before the command returns so no tick can fire into a
//! torn-down scheduler.

use crate::config::Config;
use crate::error::Result;
use crate::scheduler::GateTicker;
use colored::Colorize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Watch booked sessions until interrupted, reporting unlock transitions
pub async fn run_watch(config: Config, teacher: String, student: Option<String>) -> Result<()> {
    let scheduler = Arc::new(super::build_scheduler(&config, &teacher, student)?);

    if let Err(err) = scheduler.refresh().await {
        println!("{}", format!("Failed to load availability: {}", err).red());
        return Ok(());
    }

    if scheduler.sessions().is_empty() {
        println!("{}", "No booked sessions to watch.".yellow());
        return Ok(());
    }

    println!(
        "Watching {} session(s), re-evaluating every {}s. Press Ctrl-C to stop.",
        scheduler.sessions().len(),
        config.gate.tick_seconds
    );

    let ticking = Arc::clone(&scheduler);
    // Display-only memory of what was already reported; the gate itself is
    // re-derived from scratch on every tick.
    let mut reported: HashMap<String, bool> = HashMap::new();

    let ticker = GateTicker::spawn(
        Duration::from_secs(config.gate.tick_seconds),
        move |now| {
            for status in ticking.gate_statuses(now) {
                let was_live = reported.insert(status.session_id.clone(), status.can_join);
                match (was_live, status.can_join) {
                    (Some(true), true) => {}
                    (_, true) => {
                        let link = ticking
                            .session_for(&status.slot_id)
                            .and_then(|s| s.meeting_link)
                            .unwrap_or_default();
                        println!(
                            "{} session {} is live — join now: {}",
                            "●".green(),
                            status.session_id.cyan(),
                            link
                        );
                    }
                    (None, false) => {
                        let remaining = status
                            .countdown
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "—".to_string());
                        println!(
                            "{} session {} locked, opens in {}",
                            "○".yellow(),
                            status.session_id.cyan(),
                            remaining
                        );
                    }
                    (Some(_), false) => {}
                }
            }
        },
    );

    tokio::signal::ctrl_c().await?;

    tracing::info!("Watch interrupted, shutting down gate ticker");
    ticker.shutdown().await;
    scheduler.shutdown();
    println!("\n{}", "Stopped.".yellow());
    Ok(())
}
