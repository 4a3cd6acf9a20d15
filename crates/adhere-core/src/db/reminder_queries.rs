//! Reminder queries and the check-in state machine.
//!
//! `check_in` is the algorithmic heart of the crate: completion, tail
//! extension for a skipped day, and late-arrival re-timing of the remaining
//! sequence all commit as one immediate transaction, so a failure anywhere
//! leaves the reminder sequence exactly as it was.

use jiff::{civil::DateTime, tz::TimeZone, SignedDuration, Timestamp};
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};

use super::plan_queries::parse_timestamp;
use crate::{
    error::{DatabaseResultExt, Result, ScheduleError},
    models::{CheckInOutcome, Reminder},
};

const SELECT_REMINDER_BY_ID_SQL: &str = "SELECT id, plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, completed_at, is_active, created_at, updated_at FROM reminders WHERE id = ?1";
const SELECT_REMINDERS_BY_PLAN_SQL: &str = "SELECT id, plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, completed_at, is_active, created_at, updated_at FROM reminders WHERE plan_id = ?1 ORDER BY sequence_number";
const SELECT_DUE_REMINDERS_SQL: &str = "SELECT id, plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, completed_at, is_active, created_at, updated_at FROM reminders WHERE is_active = 1 AND completed = 0 AND scheduled_for <= ?1 ORDER BY scheduled_for, id";
const MARK_COMPLETED_SQL: &str =
    "UPDATE reminders SET completed = 1, completed_at = ?1, updated_at = ?1 WHERE id = ?2";
const SELECT_PLAN_TAIL_SQL: &str = "SELECT sequence_number, scheduled_for FROM reminders WHERE plan_id = ?1 AND is_active = 1 ORDER BY sequence_number DESC LIMIT 1";
const INSERT_TAIL_REMINDER_SQL: &str = "INSERT INTO reminders (plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)";
const SELECT_NEXT_PENDING_SQL: &str = "SELECT id, plan_id, patient_id, title, description, scheduled_for, sequence_number, completed, completed_at, is_active, created_at, updated_at FROM reminders WHERE plan_id = ?1 AND is_active = 1 AND completed = 0 AND sequence_number > ?2 ORDER BY sequence_number LIMIT 1";
const SELECT_LATER_PENDING_SQL: &str = "SELECT id, scheduled_for FROM reminders WHERE plan_id = ?1 AND is_active = 1 AND completed = 0 AND sequence_number > ?2 ORDER BY sequence_number";
const UPDATE_SCHEDULED_FOR_SQL: &str =
    "UPDATE reminders SET scheduled_for = ?1, updated_at = ?2 WHERE id = ?3";

impl super::Database {
    /// Helper function to construct a Reminder from a database row
    fn build_reminder_from_row(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
        Ok(Reminder {
            id: row.get::<_, i64>(0)? as u64,
            plan_id: row.get::<_, i64>(1)? as u64,
            patient_id: row.get::<_, i64>(2)? as u64,
            title: row.get(3)?,
            description: row.get(4)?,
            scheduled_for: parse_timestamp(row.get(5)?, 5)?,
            sequence_number: row.get::<_, i64>(6)? as u32,
            completed: row.get(7)?,
            completed_at: row
                .get::<_, Option<String>>(8)?
                .map(|s| parse_timestamp(s, 8))
                .transpose()?,
            is_active: row.get(9)?,
            created_at: parse_timestamp(row.get(10)?, 10)?,
            updated_at: parse_timestamp(row.get(11)?, 11)?,
        })
    }

    /// Retrieves all reminders for a given plan, in sequence order.
    pub fn get_reminders(&self, plan_id: u64) -> Result<Vec<Reminder>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_REMINDERS_BY_PLAN_SQL)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let reminders = stmt
            .query_map(params![plan_id as i64], Self::build_reminder_from_row)
            .map_err(|e| ScheduleError::database_error("Failed to query reminders", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScheduleError::database_error("Failed to fetch reminders", e))?;

        Ok(reminders)
    }

    /// Retrieves a single reminder by its ID.
    pub fn get_reminder(&self, reminder_id: u64) -> Result<Option<Reminder>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_REMINDER_BY_ID_SQL)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let reminder = stmt
            .query_row(params![reminder_id as i64], Self::build_reminder_from_row)
            .optional()
            .map_err(|e| ScheduleError::database_error("Failed to get reminder", e))?;

        Ok(reminder)
    }

    /// Active, uncompleted reminders due at or before `now`.
    ///
    /// The sweeper's read path. Superseded reminders never show up here, no
    /// matter how overdue they are.
    pub fn due_reminders(&self, now: Timestamp) -> Result<Vec<Reminder>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DUE_REMINDERS_SQL)
            .map_err(|e| ScheduleError::database_error("Failed to prepare query", e))?;

        let reminders = stmt
            .query_map(params![now.to_string()], Self::build_reminder_from_row)
            .map_err(|e| ScheduleError::database_error("Failed to query due reminders", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScheduleError::database_error("Failed to fetch due reminders", e))?;

        Ok(reminders)
    }

    /// Processes a patient check-in against a reminder.
    ///
    /// Runs the full transition atomically:
    ///
    /// 1. Reject a reminder that is already completed or that belongs to a
    ///    superseded plan (no mutation either way).
    /// 2. Mark the reminder completed at `now`.
    /// 3. Tail extension: a check-in on a later calendar day than scheduled
    ///    means at least one day was skipped, so one reminder is appended at
    ///    the end of the sequence (last scheduled time + 1 day).
    /// 4. Select the next pending reminder in sequence, if any.
    /// 5. If the check-in itself was late, re-anchor that next reminder to
    ///    tomorrow at the completed reminder's original time-of-day and
    ///    shift every pending reminder after it by the raw lateness,
    ///    preserving their spacing relative to the re-anchored one.
    ///
    /// The caller arms the dispatcher for the returned `next` reminder.
    pub fn check_in(&mut self, reminder_id: u64, now: Timestamp) -> Result<CheckInOutcome> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let mut reminder = tx
            .query_row(
                SELECT_REMINDER_BY_ID_SQL,
                params![reminder_id as i64],
                Self::build_reminder_from_row,
            )
            .optional()
            .map_err(|e| ScheduleError::database_error("Failed to query reminder", e))?
            .ok_or(ScheduleError::ReminderNotFound { id: reminder_id })?;

        // Re-invoking check-in on a completed reminder is a clean rejection,
        // which is what makes retrying a failed check_in call safe.
        if reminder.completed {
            return Ok(CheckInOutcome::AlreadyCompleted);
        }

        // Superseded reminders are terminal: completing or re-timing them
        // would resurrect a schedule the patient no longer has.
        if !reminder.is_active {
            return Ok(CheckInOutcome::Superseded);
        }

        let now_str = now.to_string();
        tx.execute(MARK_COMPLETED_SQL, params![&now_str, reminder_id as i64])
            .map_err(|e| ScheduleError::database_error("Failed to mark reminder completed", e))?;

        let utc = TimeZone::UTC;
        let now_date = now.to_zoned(utc.clone()).date();
        let due_date = reminder.scheduled_for.to_zoned(utc.clone()).date();

        // One extra slot per skipped check-in, regardless of how many
        // calendar days actually went by.
        let mut extended = None;
        if now_date > due_date {
            extended = Some(Self::extend_tail(&tx, &reminder, now)?);
        }

        let mut next = tx
            .query_row(
                SELECT_NEXT_PENDING_SQL,
                params![reminder.plan_id as i64, reminder.sequence_number as i64],
                Self::build_reminder_from_row,
            )
            .optional()
            .map_err(|e| ScheduleError::database_error("Failed to query next reminder", e))?;

        if let Some(ref mut next) = next {
            if now > reminder.scheduled_for {
                let lateness = now.duration_since(reminder.scheduled_for);

                // Tomorrow at the original time-of-day keeps the cadence
                // predictable for the patient even when the plan's nominal
                // spacing is a week or a month.
                let time_of_day = reminder.scheduled_for.to_zoned(utc.clone()).time();
                let tomorrow = now_date.tomorrow().map_err(|e| {
                    ScheduleError::invariant(format!("Unrepresentable re-anchor date: {e}"))
                })?;
                let re_anchored = utc
                    .to_timestamp(DateTime::from_parts(tomorrow, time_of_day))
                    .map_err(|e| {
                        ScheduleError::invariant(format!("Unrepresentable re-anchor instant: {e}"))
                    })?;

                tx.execute(
                    UPDATE_SCHEDULED_FOR_SQL,
                    params![re_anchored.to_string(), &now_str, next.id as i64],
                )
                .map_err(|e| {
                    ScheduleError::database_error("Failed to re-anchor next reminder", e)
                })?;
                next.scheduled_for = re_anchored;
                next.updated_at = now;

                Self::shift_later_reminders(&tx, next, lateness, &now_str)?;

                if let Some(ref mut extended) = extended {
                    if extended.sequence_number > next.sequence_number {
                        extended.scheduled_for = add_duration(extended.scheduled_for, lateness)?;
                        extended.updated_at = now;
                    }
                }
            }
        }

        tx.commit().db_context("Failed to commit transaction")?;

        reminder.completed = true;
        reminder.completed_at = Some(now);
        reminder.updated_at = now;

        // The tail reminder can itself be the next one (last-in-sequence
        // check-in); report the re-timed row, not the stale insert.
        if let (Some(extended), Some(next)) = (&mut extended, &next) {
            if extended.id == next.id {
                *extended = next.clone();
            }
        }

        Ok(CheckInOutcome::CheckedIn {
            reminder,
            next,
            extended,
        })
    }

    /// Appends one reminder after the plan's current last active slot.
    fn extend_tail(tx: &Transaction<'_>, completed: &Reminder, now: Timestamp) -> Result<Reminder> {
        let (max_sequence, last_scheduled): (i64, String) = tx
            .query_row(
                SELECT_PLAN_TAIL_SQL,
                params![completed.plan_id as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|e| ScheduleError::database_error("Failed to query plan tail", e))?;

        let last_scheduled = last_scheduled.parse::<Timestamp>().map_err(|e| {
            ScheduleError::invariant(format!("Unparseable tail schedule: {e}"))
        })?;
        let scheduled_for = add_duration(last_scheduled, SignedDuration::from_hours(24))?;
        let sequence = max_sequence as u32 + 1;

        tx.execute(
            INSERT_TAIL_REMINDER_SQL,
            params![
                completed.plan_id as i64,
                completed.patient_id as i64,
                &completed.title,
                &completed.description,
                scheduled_for.to_string(),
                sequence,
                now.to_string()
            ],
        )
        .map_err(|e| ScheduleError::database_error("Failed to append tail reminder", e))?;

        Ok(Reminder {
            id: tx.last_insert_rowid() as u64,
            plan_id: completed.plan_id,
            patient_id: completed.patient_id,
            title: completed.title.clone(),
            description: completed.description.clone(),
            scheduled_for,
            sequence_number: sequence,
            completed: false,
            completed_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Slides every pending reminder after `next` forward by `lateness`,
    /// preserving relative spacing to the re-anchored next reminder.
    fn shift_later_reminders(
        tx: &Transaction<'_>,
        next: &Reminder,
        lateness: SignedDuration,
        now_str: &str,
    ) -> Result<()> {
        let mut stmt = tx.prepare(SELECT_LATER_PENDING_SQL).map_err(|e| {
            ScheduleError::database_error("Failed to prepare later-reminder query", e)
        })?;
        let later: Vec<(i64, String)> = stmt
            .query_map(
                params![next.plan_id as i64, next.sequence_number as i64],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|e| ScheduleError::database_error("Failed to query later reminders", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ScheduleError::database_error("Failed to fetch later reminders", e))?;
        drop(stmt);

        for (id, scheduled_for) in later {
            let scheduled_for = scheduled_for.parse::<Timestamp>().map_err(|e| {
                ScheduleError::invariant(format!("Unparseable reminder schedule: {e}"))
            })?;
            let shifted = add_duration(scheduled_for, lateness)?;
            tx.execute(
                UPDATE_SCHEDULED_FOR_SQL,
                params![shifted.to_string(), now_str, id],
            )
            .map_err(|e| ScheduleError::database_error("Failed to shift reminder", e))?;
        }

        Ok(())
    }
}

fn add_duration(ts: Timestamp, duration: SignedDuration) -> Result<Timestamp> {
    ts.checked_add(duration)
        .map_err(|e| ScheduleError::invariant(format!("Schedule overflow: {e}")))
}
