//! Check-in outcome types.

use serde::{Deserialize, Serialize};

use super::Reminder;

/// Result of processing a check-in against a reminder.
///
/// `AlreadyCompleted` is a caller error surfaced as a status, not a
/// [`ScheduleError`](crate::error::ScheduleError): repeating a check-in call
/// is safe precisely because the second invocation is rejected here without
/// touching any state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// The reminder was marked done.
    CheckedIn {
        /// The completed reminder as persisted
        reminder: Reminder,
        /// Next pending reminder in sequence, re-timed if the check-in was
        /// late, or `None` when the plan's active tail is exhausted
        next: Option<Reminder>,
        /// Reminder appended to the tail when the check-in arrived on a
        /// later calendar day than scheduled
        extended: Option<Reminder>,
    },
    /// The reminder had already been checked in; nothing was mutated.
    AlreadyCompleted,
    /// The reminder's plan was superseded by a newer one; nothing was
    /// mutated. Supersession is terminal, so there is no schedule left to
    /// complete or re-time.
    Superseded,
}
