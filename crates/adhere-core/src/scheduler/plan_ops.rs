//! Plan operations for the Scheduler.

use jiff::Timestamp;
use log::warn;
use tokio::task;

use super::Scheduler;
use crate::{
    db::Database,
    error::{Result, ScheduleError},
    models::{ActionPlan, PlanSummary, Reminder},
    params::{CreatePlan, Id, ListPlans, ListReminders},
};

impl Scheduler {
    /// Creates and activates a plan, materializing its reminder sequence.
    ///
    /// Supersession of the patient's prior active plan, insertion of the new
    /// plan, and materialization of all of its reminders commit as one
    /// transaction. Afterwards the dispatcher is armed for the first
    /// reminder; an arming failure is logged and left to the sweeper, never
    /// surfaced to the caller.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<ActionPlan> {
        let db_path = self.db_path.clone();
        let request = params.clone();
        let now = self.clock.now();

        let plan = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.activate_plan(&request, now)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        if let Some(first) = plan.reminders.first() {
            self.arm_dispatch(first);
        }

        Ok(plan)
    }

    /// Retrieves a plan by its ID with reminders eagerly loaded.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<ActionPlan>> {
        let db_path = self.db_path.clone();
        let plan_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plan(plan_id)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a patient's single active plan, if one exists.
    pub async fn active_plan_for_patient(&self, patient_id: u64) -> Result<Option<ActionPlan>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.active_plan_for_patient(patient_id)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists plan summaries with reminder progress counts.
    pub async fn list_plans(&self, params: &ListPlans) -> Result<Vec<PlanSummary>> {
        let db_path = self.db_path.clone();
        let filter = params.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_plan_summaries(&filter)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists a plan's reminders in sequence order.
    ///
    /// Returns `PlanNotFound` for an unknown plan rather than an empty list.
    pub async fn list_reminders(&self, params: &ListReminders) -> Result<Vec<Reminder>> {
        let db_path = self.db_path.clone();
        let plan_id = params.plan_id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            if db.get_plan(plan_id)?.is_none() {
                return Err(ScheduleError::PlanNotFound { id: plan_id });
            }
            db.get_reminders(plan_id)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Active, uncompleted reminders due at or before `now` (the sweeper's
    /// read path). `None` means "now" per the scheduler's clock.
    pub async fn due_reminders(&self, at: Option<Timestamp>) -> Result<Vec<Reminder>> {
        let db_path = self.db_path.clone();
        let now = at.unwrap_or_else(|| self.clock.now());

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.due_reminders(now)
        })
        .await
        .map_err(|e| ScheduleError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Arms the dispatch timer for a reminder. Non-fatal by contract: an
    /// unreachable timer backend costs a delayed notification, which the
    /// sweeper repairs on its next cycle.
    pub(crate) fn arm_dispatch(&self, reminder: &Reminder) {
        if let Err(e) = self.timer.schedule(reminder.id, reminder.scheduled_for) {
            warn!(
                "failed to arm dispatch for reminder {} at {}: {e}",
                reminder.id, reminder.scheduled_for
            );
        }
    }
}
