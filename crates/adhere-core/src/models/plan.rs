//! Action plan model definition.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Frequency, Reminder};

/// A prescribed recurring action ("take drug X daily for 7 days").
///
/// At most one plan per patient is active at a time: activating a new plan
/// deactivates the patient's prior plan and its reminders in the same
/// transaction (supersession).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionPlan {
    /// Unique identifier for the plan
    pub id: u64,

    /// Patient this plan belongs to
    pub patient_id: u64,

    /// Clinical note the plan was extracted from, if any
    pub note_id: Option<u64>,

    /// Prescribed action text
    pub action: String,

    /// Recurrence cadence
    #[serde(default)]
    pub frequency: Frequency,

    /// Opaque custom schedule, only meaningful when frequency is custom
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_schedule: Option<serde_json::Value>,

    /// Calendar date of the first occurrence
    pub start_date: Date,

    /// Number of occurrences to materialize
    pub duration_days: i64,

    /// Whether this is the patient's current plan
    pub is_active: bool,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plan was last modified (UTC)
    pub updated_at: Timestamp,

    /// Associated reminders (lazy-loaded by default)
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}
