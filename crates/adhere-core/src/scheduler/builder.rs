//! Builder for creating and configuring Scheduler instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, ScheduleError},
    ports::{NullTimer, SharedClock, SharedTimer, SystemClock},
};

/// Builder for creating and configuring Scheduler instances.
#[derive(Clone)]
pub struct SchedulerBuilder {
    database_path: Option<PathBuf>,
    clock: Option<SharedClock>,
    timer: Option<SharedTimer>,
}

impl SchedulerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            clock: None,
            timer: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/adhere/adhere.db` or `~/.local/share/adhere/adhere.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Injects a time source. Defaults to [`SystemClock`].
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Injects a dispatch-timer backend used to arm notifications.
    ///
    /// Defaults to [`NullTimer`], which drops every arming request; the
    /// sweeper then carries the dispatch load. One-shot CLI invocations run
    /// this way since no dispatch loop outlives the process.
    pub fn with_timer(mut self, timer: SharedTimer) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Builds the configured scheduler instance.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::FileSystem` if the database path is invalid
    /// Returns `ScheduleError::Database` if database initialization fails
    pub async fn build(self) -> Result<Scheduler> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScheduleError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), ScheduleError>(())
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let timer = self.timer.unwrap_or_else(|| Arc::new(NullTimer));

        Ok(Scheduler::new(db_path, clock, timer))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("adhere")
            .place_data_file("adhere.db")
            .map_err(|e| ScheduleError::XdgDirectory(e.to_string()))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
