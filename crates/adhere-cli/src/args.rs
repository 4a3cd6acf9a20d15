use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ExtractArgs, PlanCommands, ReminderCommands, RunArgs};

/// Main command-line interface for the Adhere reminder scheduler
///
/// Adhere turns clinician-prescribed treatment actions into ordered reminder
/// sequences, tracks patient check-ins, and re-times the remaining schedule
/// when a check-in arrives late. Besides the one-shot management commands it
/// can run as a long-lived service that dispatches notifications and sweeps
/// for due reminders.
#[derive(Parser)]
#[command(version, about, name = "adhere")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/adhere/adhere.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Adhere CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage action plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Manage reminders and check-ins
    #[command(alias = "r")]
    Reminder {
        #[command(subcommand)]
        command: ReminderCommands,
    },
    /// Activate plans from a note-extraction payload
    #[command(alias = "x")]
    Extract(ExtractArgs),
    /// Run the notification dispatch service
    Run(RunArgs),
}
