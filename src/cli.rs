//! Command-line interface definition for stuportal
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for listing availability, booking a slot, and
//! watching the join gate.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stuportal - Student portal scheduling CLI
///
/// Browse a teacher's availability, book a slot, and watch booked
/// sessions unlock at their scheduled start time.
#[derive(Parser, Debug, Clone)]
#[command(name = "stuportal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "STUPORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Student id to act as; booking requires it
    #[arg(short, long, env = "STUPORTAL_STUDENT_ID")]
    pub student: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for stuportal
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List a teacher's availability, grouped by date
    Slots {
        /// Teacher whose availability to list
        #[arg(short, long)]
        teacher: String,

        /// Status filter: all, available, or booked
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Hide booked slots
        #[arg(long)]
        hide_booked: bool,

        /// Only show one date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List your booked sessions with their join state
    Sessions {
        /// Teacher whose availability the sessions belong to
        #[arg(short, long)]
        teacher: String,
    },

    /// Book one availability slot
    Book {
        /// Teacher who published the slot
        #[arg(short, long)]
        teacher: String,

        /// The slot to book
        #[arg(long)]
        slot: String,

        /// Requested session length in minutes
        #[arg(short, long)]
        duration: u32,
    },

    /// Watch your sessions and report when their meeting links unlock
    Watch {
        /// Teacher whose availability the sessions belong to
        #[arg(short, long)]
        teacher: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
