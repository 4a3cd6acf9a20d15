//! Notification dispatch: the escalating nag loop.
//!
//! [`Dispatcher::notify`] is the single send path used by armed timers and
//! by the sweeper. It re-checks the reminder's state at fire time, which is
//! what makes every producer idempotent: a reminder completed or superseded
//! between arming and firing is a silent no-op.

use std::{path::PathBuf, sync::Arc};

use jiff::SignedDuration;
use log::{debug, warn};
use tokio::task;

use crate::{
    db::Database,
    error::{Result, ScheduleError},
    models::Reminder,
    ports::{SharedClock, SharedTimer, SharedTransport},
};

pub mod sweeper;
pub mod timer;

pub use sweeper::Sweeper;
pub use timer::{run_dispatch_loop, DispatchAt, TimerQueue};

/// How long after an unanswered notification the next one fires.
pub const ESCALATION_INTERVAL: SignedDuration = SignedDuration::from_hours(1);

/// Sends due-notifications and keeps re-arming itself until check-in.
pub struct Dispatcher {
    db_path: PathBuf,
    transport: SharedTransport,
    timer: SharedTimer,
    clock: SharedClock,
}

impl Dispatcher {
    /// Creates a dispatcher over the given database and ports.
    pub fn new(
        db_path: PathBuf,
        transport: SharedTransport,
        timer: SharedTimer,
        clock: SharedClock,
    ) -> Arc<Self> {
        Arc::new(Self {
            db_path,
            transport,
            timer,
            clock,
        })
    }

    /// Fires a notification for a reminder if it is still pending.
    ///
    /// Regardless of send success, another `notify` is armed one hour later;
    /// the loop only terminates once check-in completes the reminder or a
    /// newer plan supersedes it, both observed via the pending check at the
    /// next fire. Transport and arming failures are logged, never
    /// propagated, so a transient outage heals itself.
    pub async fn notify(&self, reminder_id: u64) -> Result<()> {
        let db_path = self.db_path.clone();
        let reminder = task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_reminder(reminder_id)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let Some(reminder) = reminder else {
            debug!("dispatch fired for unknown reminder {reminder_id}");
            return Ok(());
        };

        if !reminder.is_pending() {
            return Ok(());
        }

        // No database lock is held across the send.
        self.send(&reminder);

        let eta = match self.clock.now().checked_add(ESCALATION_INTERVAL) {
            Ok(eta) => eta,
            Err(e) => return Err(ScheduleError::invariant(format!("Escalation overflow: {e}"))),
        };
        if let Err(e) = self.timer.schedule(reminder.id, eta) {
            warn!(
                "failed to re-arm escalation for reminder {}: {e}",
                reminder.id
            );
        }

        Ok(())
    }

    fn send(&self, reminder: &Reminder) {
        let subject = format!(
            "Reminder: {} - Day {}",
            reminder.title, reminder.sequence_number
        );
        let body = match &reminder.description {
            Some(description) => format!(
                "This is a reminder for your action plan: {description}\n\nPlease check in once completed."
            ),
            None => "Please check in once completed.".to_string(),
        };

        if let Err(e) = self.transport.send(reminder.patient_id, &subject, &body) {
            warn!(
                "failed to send notification for reminder {}: {e}",
                reminder.id
            );
        }
    }
}
