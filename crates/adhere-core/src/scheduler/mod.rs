//! High-level scheduling API for action plans and reminders.
//!
//! [`Scheduler`] is the central coordinator between interface layers and the
//! database, owning the clock and the dispatch-timer port:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Interfaces    │    │    Scheduler    │    │    Database     │
//! │   (CLI, ...)    │───▶│ (plan_ops,      │───▶│   (via db/)     │
//! │                 │    │  checkin)       │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Operations are async and delegate blocking SQLite work to
//! `tokio::task::spawn_blocking`, opening a connection per operation keyed
//! by the database path. Plan activation and check-in are short transactional
//! units; arming the notification dispatcher afterwards is fire-and-forget
//! and never fails the surrounding operation (the sweeper recovers anything
//! a failed arm would have dropped).

use std::path::{Path, PathBuf};

use crate::ports::{SharedClock, SharedTimer};

pub mod builder;
pub mod checkin;
pub mod plan_ops;


// Re-export the main types
pub use builder::SchedulerBuilder;

/// Main scheduling interface for managing plans, reminders, and check-ins.
pub struct Scheduler {
    pub(crate) db_path: PathBuf,
    pub(crate) clock: SharedClock,
    pub(crate) timer: SharedTimer,
}

impl Scheduler {
    /// Creates a new scheduler with the specified database path and ports.
    pub(crate) fn new(db_path: PathBuf, clock: SharedClock, timer: SharedTimer) -> Self {
        Self {
            db_path,
            clock,
            timer,
        }
    }

    /// Path of the backing database, for wiring a dispatcher and sweeper
    /// over the same store.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }
}
