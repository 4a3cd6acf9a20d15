//! Check-in operation for the Scheduler.

use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, ScheduleError},
    models::CheckInOutcome,
    params::CheckIn,
};

impl Scheduler {
    /// Processes a patient check-in against a reminder.
    ///
    /// The whole transition (completion, tail extension, late re-timing)
    /// commits atomically in the database layer; see
    /// [`Database::check_in`](crate::db::Database::check_in). On success the
    /// dispatcher is re-armed for the next pending reminder, fire-and-forget.
    ///
    /// A reminder that was already checked in yields
    /// [`CheckInOutcome::AlreadyCompleted`] without mutating anything, so
    /// callers may safely retry a failed call.
    pub async fn check_in(&self, params: &CheckIn) -> Result<CheckInOutcome> {
        let db_path = self.db_path.clone();
        let reminder_id = params.reminder_id;
        let now = params.at.unwrap_or_else(|| self.clock.now());

        let outcome = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.check_in(reminder_id, now)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        if let CheckInOutcome::CheckedIn {
            next: Some(ref next),
            ..
        } = outcome
        {
            self.arm_dispatch(next);
        }

        Ok(outcome)
    }
}
