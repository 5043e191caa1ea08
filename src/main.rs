//! stuportal - Student portal scheduling CLI
//!
#![doc = "stuportal - Student portal scheduling CLI"]
#![doc = "Main entry point for the stuportal client application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stuportal::cli::{Cli, Commands};
use stuportal::commands;
use stuportal::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| "config/config.yaml".into());
    let config = Config::load(&config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Slots {
            teacher,
            filter,
            hide_booked,
            date,
        } => {
            tracing::info!("Listing availability for teacher {}", teacher);
            commands::slots::run_slots(config, teacher, cli.student, filter, hide_booked, date)
                .await?;
            Ok(())
        }
        Commands::Sessions { teacher } => {
            tracing::info!("Listing sessions for teacher {}", teacher);
            commands::sessions::run_sessions(config, teacher, cli.student).await?;
            Ok(())
        }
        Commands::Book {
            teacher,
            slot,
            duration,
        } => {
            tracing::info!("Booking slot {} with teacher {}", slot, teacher);
            commands::book::run_book(config, teacher, cli.student, slot, duration).await?;
            Ok(())
        }
        Commands::Watch { teacher } => {
            tracing::info!("Watching sessions for teacher {}", teacher);
            commands::watch::run_watch(config, teacher, cli.student).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stuportal=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
