//! Plan summary projection for list views.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::Frequency;

/// Compact plan representation with reminder progress counts.
///
/// Backed by the `plan_summaries` / `all_plan_summaries` database views, so
/// listing plans never loads full reminder rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Unique identifier for the plan
    pub id: u64,

    /// Patient the plan belongs to
    pub patient_id: u64,

    /// Prescribed action text
    pub action: String,

    /// Recurrence cadence
    pub frequency: Frequency,

    /// Calendar date of the first occurrence
    pub start_date: Date,

    /// Number of occurrences materialized at activation
    pub duration_days: i64,

    /// Whether this is the patient's current plan
    pub is_active: bool,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Total reminders counted by the view
    pub total_reminders: u32,

    /// Reminders already checked in
    pub completed_reminders: u32,

    /// Reminders still pending
    pub pending_reminders: u32,
}
