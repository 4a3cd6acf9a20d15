//! Parameter structures for scheduling operations.
//!
//! Shared parameter structs usable across interfaces (CLI today, an HTTP
//! layer tomorrow) without framework-specific derives. Interface layers
//! define their own wrapper structs with clap/serde derives and convert
//! into these via `From`, keeping the core free of UI concerns.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use crate::models::Frequency;

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating and activating an action plan.
///
/// Creation, supersession of the patient's prior plan, and materialization
/// of the reminder sequence happen in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Patient the plan is for
    pub patient_id: u64,
    /// Owning clinical note, if the plan came from one
    pub note_id: Option<u64>,
    /// Prescribed action text (becomes each reminder's title)
    pub action: String,
    /// Recurrence cadence
    pub frequency: Frequency,
    /// Opaque custom schedule, stored but not evaluated
    pub custom_schedule: Option<serde_json::Value>,
    /// Calendar date of the first occurrence
    pub start_date: Date,
    /// Number of occurrences to materialize. Zero is allowed and yields an
    /// active but inert plan; negative values are rejected, as are values
    /// beyond [`MAX_DURATION_DAYS`](crate::db::plan_queries::MAX_DURATION_DAYS).
    pub duration_days: i64,
}

/// Parameters for checking in on a reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    /// The reminder being acknowledged
    pub reminder_id: u64,
    /// Check-in instant; defaults to the scheduler's clock when `None`
    pub at: Option<Timestamp>,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlans {
    /// Restrict to one patient's plans
    pub patient_id: Option<u64>,
    /// Include superseded plans alongside active ones
    pub include_inactive: bool,
}

/// Parameters for listing a plan's reminders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReminders {
    /// Plan whose reminders to list
    pub plan_id: u64,
}
