//! Reminder model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One scheduled occurrence belonging to exactly one action plan.
///
/// Within a plan's active reminders, `sequence_number` forms a contiguous
/// run starting at 1 and `scheduled_for` is non-decreasing in sequence
/// order. A completed reminder's `scheduled_for` is never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    /// Unique identifier for the reminder
    pub id: u64,

    /// ID of the owning action plan
    pub plan_id: u64,

    /// Patient the reminder is addressed to
    pub patient_id: u64,

    /// Brief title (copied from the plan's action text)
    pub title: String,

    /// Longer description shown in the notification body
    pub description: Option<String>,

    /// When the reminder is due (UTC)
    pub scheduled_for: Timestamp,

    /// 1-based position within the plan's sequence
    pub sequence_number: u32,

    /// Whether the patient has checked in for this occurrence
    pub completed: bool,

    /// When the check-in happened, if it has
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    /// False once a newer plan supersedes this reminder's plan
    pub is_active: bool,

    /// Timestamp when the reminder was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the reminder was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Reminder {
    /// A reminder is pending while it is active and not yet checked in.
    /// Only pending reminders are dispatched or re-timed.
    pub fn is_pending(&self) -> bool {
        self.is_active && !self.completed
    }
}
