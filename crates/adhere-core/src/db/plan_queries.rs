//! Action plan activation, materialization, and queries.

use jiff::{
    civil::{Date, DateTime},
    tz::TimeZone,
    Timestamp,
};
use rusqlite::{params, types::Type, OptionalExtension, TransactionBehavior};

use crate::{
    error::{DatabaseResultExt, Result, ScheduleError},
    models::{ActionPlan, Frequency, PlanSummary, Reminder},
    params::{CreatePlan, ListPlans},
};

// Optimized SQL queries as const strings for compile-time optimization
const DEACTIVATE_PATIENT_REMINDERS_SQL: &str =
    "UPDATE reminders SET is_active = 0, updated_at = ?1 WHERE patient_id = ?2 AND is_active = 1";
const DEACTIVATE_PATIENT_PLANS_SQL: &str =
    "UPDATE action_plans SET is_active = 0, updated_at = ?1 WHERE patient_id = ?2 AND is_active = 1";
const INSERT_PLAN_SQL: &str = "INSERT INTO action_plans (patient_id, note_id, action, frequency, custom_schedule, start_date, duration_days, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)";
const INSERT_REMINDER_SQL: &str = "INSERT INTO reminders (plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?8)";
const SELECT_PLAN_SQL: &str = "SELECT id, patient_id, note_id, action, frequency, custom_schedule, start_date, duration_days, is_active, created_at, updated_at FROM action_plans WHERE id = ?1";
const SELECT_ACTIVE_PLAN_FOR_PATIENT_SQL: &str = "SELECT id, patient_id, note_id, action, frequency, custom_schedule, start_date, duration_days, is_active, created_at, updated_at FROM action_plans WHERE patient_id = ?1 AND is_active = 1";

/// Upper bound on occurrences per plan (ten years of daily reminders).
/// Materialization is eager, so an unbounded count would insert one row per
/// occurrence in a single transaction.
pub const MAX_DURATION_DAYS: i64 = 3650;

// Base queries for plan listing
const PLAN_SUMMARY_COLUMNS: &str = "id, patient_id, action, frequency, start_date, duration_days, is_active, created_at, total_reminders, completed_reminders, pending_reminders";
const PLAN_SUMMARIES_VIEW: &str = "plan_summaries";
const ALL_PLAN_SUMMARIES_VIEW: &str = "all_plan_summaries";

/// Parses a persisted timestamp column, mapping bad data to a conversion
/// failure on the given column index.
pub(super) fn parse_timestamp(value: String, column: usize) -> rusqlite::Result<Timestamp> {
    value.parse::<Timestamp>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
    })
}

impl super::Database {
    /// Helper function to construct an ActionPlan from a database row
    fn build_plan_from_row(row: &rusqlite::Row) -> rusqlite::Result<ActionPlan> {
        let frequency_str: String = row.get(4)?;
        let frequency = frequency_str.parse::<Frequency>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid frequency: {frequency_str}").into(),
            )
        })?;

        let custom_schedule: Option<String> = row.get(5)?;
        let custom_schedule = custom_schedule
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        let start_date: String = row.get(6)?;
        let start_date = start_date.parse::<Date>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
        })?;

        Ok(ActionPlan {
            id: row.get::<_, i64>(0)? as u64,
            patient_id: row.get::<_, i64>(1)? as u64,
            note_id: row.get::<_, Option<i64>>(2)?.map(|id| id as u64),
            action: row.get(3)?,
            frequency,
            custom_schedule,
            start_date,
            duration_days: row.get(7)?,
            is_active: row.get(8)?,
            created_at: parse_timestamp(row.get(9)?, 9)?,
            updated_at: parse_timestamp(row.get(10)?, 10)?,
            reminders: Vec::new(),
        })
    }

    /// Creates and activates a plan, materializing its reminder sequence.
    ///
    /// One immediate transaction covers the whole activation: every other
    /// active reminder and plan for the patient is deactivated first
    /// (supersession), then the plan row and all of its reminders are
    /// inserted. A crash can therefore never leave the patient between
    /// plans.
    ///
    /// Reminders are anchored to `start_date` at `now`'s UTC time-of-day and
    /// spaced by the frequency interval. A custom frequency materializes no
    /// reminders; so does `duration_days = 0`.
    pub fn activate_plan(&mut self, request: &CreatePlan, now: Timestamp) -> Result<ActionPlan> {
        if request.duration_days < 0 {
            return Err(ScheduleError::InvalidInput {
                field: "duration_days".into(),
                reason: format!("Duration must not be negative, got {}", request.duration_days),
            });
        }
        if request.duration_days > MAX_DURATION_DAYS {
            return Err(ScheduleError::InvalidInput {
                field: "duration_days".into(),
                reason: format!(
                    "Duration must not exceed {MAX_DURATION_DAYS}, got {}",
                    request.duration_days
                ),
            });
        }

        let occurrences = expand_occurrences(
            request.frequency,
            request.start_date,
            request.duration_days,
            now,
        )?;

        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let now_str = now.to_string();

        // Supersession: the new plan replaces whatever the patient had.
        tx.execute(
            DEACTIVATE_PATIENT_REMINDERS_SQL,
            params![&now_str, request.patient_id as i64],
        )
        .map_err(|e| ScheduleError::database_error("Failed to deactivate prior reminders", e))?;

        tx.execute(
            DEACTIVATE_PATIENT_PLANS_SQL,
            params![&now_str, request.patient_id as i64],
        )
        .map_err(|e| ScheduleError::database_error("Failed to deactivate prior plans", e))?;

        let custom_schedule_str = request
            .custom_schedule
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                request.patient_id as i64,
                request.note_id.map(|id| id as i64),
                &request.action,
                request.frequency.as_str(),
                custom_schedule_str.as_deref(),
                request.start_date.to_string(),
                request.duration_days,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| ScheduleError::database_error("Failed to insert plan", e))?;

        let plan_id = tx.last_insert_rowid() as u64;

        let mut reminders = Vec::with_capacity(occurrences.len());
        for (sequence, scheduled_for) in occurrences {
            tx.execute(
                INSERT_REMINDER_SQL,
                params![
                    plan_id as i64,
                    request.patient_id as i64,
                    &request.action,
                    &request.action,
                    scheduled_for.to_string(),
                    sequence,
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| ScheduleError::database_error("Failed to insert reminder", e))?;

            reminders.push(Reminder {
                id: tx.last_insert_rowid() as u64,
                plan_id,
                patient_id: request.patient_id,
                title: request.action.clone(),
                description: Some(request.action.clone()),
                scheduled_for,
                sequence_number: sequence,
                completed: false,
                completed_at: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ActionPlan {
            id: plan_id,
            patient_id: request.patient_id,
            note_id: request.note_id,
            action: request.action.clone(),
            frequency: request.frequency,
            custom_schedule: request.custom_schedule.clone(),
            start_date: request.start_date,
            duration_days: request.duration_days,
            is_active: true,
            created_at: now,
            updated_at: now,
            reminders,
        })
    }

    /// Retrieves a plan by its ID with reminders eagerly loaded.
    pub fn get_plan(&self, id: u64) -> Result<Option<ActionPlan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PLAN_SQL)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let mut plan = stmt
            .query_row(params![id as i64], Self::build_plan_from_row)
            .optional()
            .map_err(|e| ScheduleError::database_error("Failed to query plan", e))?;

        if let Some(ref mut plan) = plan {
            plan.reminders = self.get_reminders(plan.id)?;
        }

        Ok(plan)
    }

    /// Retrieves a patient's single active plan, if one exists.
    pub fn active_plan_for_patient(&self, patient_id: u64) -> Result<Option<ActionPlan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVE_PLAN_FOR_PATIENT_SQL)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let mut plan = stmt
            .query_row(params![patient_id as i64], Self::build_plan_from_row)
            .optional()
            .map_err(|e| ScheduleError::database_error("Failed to query active plan", e))?;

        if let Some(ref mut plan) = plan {
            plan.reminders = self.get_reminders(plan.id)?;
        }

        Ok(plan)
    }

    /// Lists plan summaries, optionally restricted to one patient and
    /// optionally including superseded plans.
    pub fn list_plan_summaries(&self, filter: &ListPlans) -> Result<Vec<PlanSummary>> {
        let view_name = if filter.include_inactive {
            ALL_PLAN_SUMMARIES_VIEW
        } else {
            PLAN_SUMMARIES_VIEW
        };

        let mut query = format!("SELECT {PLAN_SUMMARY_COLUMNS} FROM {view_name}");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(patient_id) = filter.patient_id {
            query.push_str(" WHERE patient_id = ?");
            params_vec.push(Box::new(patient_id as i64));
        }

        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], Self::build_summary_from_row)
            .map_err(|e| ScheduleError::database_error("Failed to query plan summaries", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScheduleError::database_error("Failed to fetch plan summaries", e))?;

        Ok(summaries)
    }

    /// Helper function to construct a PlanSummary from a view row
    fn build_summary_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlanSummary> {
        let frequency_str: String = row.get(3)?;
        let frequency = frequency_str.parse::<Frequency>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("Invalid frequency: {frequency_str}").into(),
            )
        })?;

        let start_date: String = row.get(4)?;
        let start_date = start_date.parse::<Date>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
        })?;

        Ok(PlanSummary {
            id: row.get::<_, i64>(0)? as u64,
            patient_id: row.get::<_, i64>(1)? as u64,
            action: row.get(2)?,
            frequency,
            start_date,
            duration_days: row.get(5)?,
            is_active: row.get(6)?,
            created_at: parse_timestamp(row.get(7)?, 7)?,
            total_reminders: row.get::<_, i64>(8)? as u32,
            completed_reminders: row.get::<_, i64>(9)? as u32,
            pending_reminders: row.get::<_, i64>(10)? as u32,
        })
    }
}

/// Expands a plan into `(sequence_number, scheduled_for)` pairs.
///
/// All occurrences share one time-of-day: `now`'s UTC time-of-day applied to
/// `start_date`, then spaced by the frequency interval. Custom frequency is
/// a deliberate pass-through that yields nothing.
fn expand_occurrences(
    frequency: Frequency,
    start_date: Date,
    duration_days: i64,
    now: Timestamp,
) -> Result<Vec<(u32, Timestamp)>> {
    let Some(interval) = frequency.interval() else {
        return Ok(Vec::new());
    };

    if duration_days <= 0 {
        return Ok(Vec::new());
    }

    let time_of_day = now.to_zoned(TimeZone::UTC).time();
    let first = TimeZone::UTC
        .to_timestamp(DateTime::from_parts(start_date, time_of_day))
        .map_err(|e| ScheduleError::invariant(format!("Unrepresentable start instant: {e}")))?;

    let mut occurrences = Vec::with_capacity(duration_days as usize);
    let mut current = first;
    for sequence in 1..=duration_days as u32 {
        occurrences.push((sequence, current));
        current = current
            .checked_add(interval)
            .map_err(|e| ScheduleError::invariant(format!("Schedule overflow: {e}")))?;
    }

    Ok(occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("valid timestamp")
    }

    #[test]
    fn daily_occurrences_share_time_of_day() {
        let occurrences = expand_occurrences(
            Frequency::Daily,
            "2024-01-01".parse().unwrap(),
            3,
            ts("2024-01-01T09:00:00Z"),
        )
        .unwrap();

        assert_eq!(
            occurrences,
            vec![
                (1, ts("2024-01-01T09:00:00Z")),
                (2, ts("2024-01-02T09:00:00Z")),
                (3, ts("2024-01-03T09:00:00Z")),
            ]
        );
    }

    #[test]
    fn weekly_and_monthly_spacing() {
        let weekly = expand_occurrences(
            Frequency::Weekly,
            "2024-01-01".parse().unwrap(),
            2,
            ts("2024-01-05T12:30:00Z"),
        )
        .unwrap();
        assert_eq!(weekly[1].1, ts("2024-01-08T12:30:00Z"));

        // Monthly is a fixed 30 days, not a calendar month.
        let monthly = expand_occurrences(
            Frequency::Monthly,
            "2024-01-01".parse().unwrap(),
            2,
            ts("2024-01-01T08:00:00Z"),
        )
        .unwrap();
        assert_eq!(monthly[1].1, ts("2024-01-31T08:00:00Z"));
    }

    #[test]
    fn custom_and_zero_duration_yield_nothing() {
        let custom = expand_occurrences(
            Frequency::Custom,
            "2024-01-01".parse().unwrap(),
            5,
            ts("2024-01-01T09:00:00Z"),
        )
        .unwrap();
        assert!(custom.is_empty());

        let inert = expand_occurrences(
            Frequency::Daily,
            "2024-01-01".parse().unwrap(),
            0,
            ts("2024-01-01T09:00:00Z"),
        )
        .unwrap();
        assert!(inert.is_empty());
    }
}
