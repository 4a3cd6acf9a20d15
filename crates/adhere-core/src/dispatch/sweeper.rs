//! Periodic recovery scan for due-but-undispatched reminders.

use std::{path::PathBuf, sync::Arc, time::Duration};

use jiff::Timestamp;
use log::{info, warn};
use tokio::task;

use super::Dispatcher;
use crate::{
    db::Database,
    error::{Result, ScheduleError},
    ports::SharedClock,
};

/// Default spacing between sweep cycles.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Safety net behind the dispatch timers.
///
/// Discovers active, uncompleted, past-due reminders whose arming was lost
/// (timer backend down at materialization or check-in time) and pushes each
/// through the dispatcher's send path. Idempotent by construction: the
/// dispatcher re-checks pending state at fire time, so racing a check-in
/// costs nothing. The sweeper itself never mutates reminder rows.
pub struct Sweeper {
    db_path: PathBuf,
    dispatcher: Arc<Dispatcher>,
    clock: SharedClock,
}

impl Sweeper {
    /// Creates a sweeper over the given database and dispatcher.
    pub fn new(db_path: PathBuf, dispatcher: Arc<Dispatcher>, clock: SharedClock) -> Self {
        Self {
            db_path,
            dispatcher,
            clock,
        }
    }

    /// Runs one sweep cycle. Returns the number of reminders re-dispatched.
    ///
    /// `None` means "now" per the sweeper's clock.
    pub async fn sweep(&self, at: Option<Timestamp>) -> Result<usize> {
        let now = at.unwrap_or_else(|| self.clock.now());
        let db_path = self.db_path.clone();

        let due = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.due_reminders(now)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let count = due.len();
        for reminder in due {
            if let Err(e) = self.dispatcher.notify(reminder.id).await {
                warn!("sweep dispatch failed for reminder {}: {e}", reminder.id);
            }
        }

        Ok(count)
    }

    /// Sweeps forever on a fixed interval.
    pub async fn run(&self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match self.sweep(None).await {
                Ok(0) => {}
                Ok(count) => info!("sweep re-dispatched {count} due reminder(s)"),
                Err(e) => warn!("sweep cycle failed: {e}"),
            }
        }
    }
}
