//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{ActionPlan, CheckInOutcome};

/// Wrapper type for displaying the result of plan creation.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<ActionPlan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Activated plan with ID: {} ({} reminder(s) scheduled)",
            self.resource.id,
            self.resource.reminders.len()
        )?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying a check-in outcome.
pub struct CheckInResult(pub CheckInOutcome);

impl fmt::Display for CheckInResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            CheckInOutcome::AlreadyCompleted => {
                writeln!(f, "Reminder was already checked in; nothing to do.")
            }
            CheckInOutcome::Superseded => {
                writeln!(f, "Reminder belongs to a superseded plan; nothing to do.")
            }
            CheckInOutcome::CheckedIn {
                reminder,
                next,
                extended,
            } => {
                writeln!(
                    f,
                    "Checked in reminder {} (day {}).",
                    reminder.id, reminder.sequence_number
                )?;
                if let Some(extended) = extended {
                    writeln!(
                        f,
                        "Missed day detected: plan extended with day {} due {}.",
                        extended.sequence_number,
                        LocalDateTime(&extended.scheduled_for)
                    )?;
                }
                match next {
                    Some(next) => writeln!(
                        f,
                        "Next reminder: day {} due {}.",
                        next.sequence_number,
                        LocalDateTime(&next.scheduled_for)
                    ),
                    None => writeln!(f, "Plan complete: no reminders left."),
                }
            }
        }
    }
}

/// Wrapper type for displaying a sweep cycle's outcome.
pub struct SweepResult(pub usize);

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => writeln!(f, "No due reminders."),
            count => writeln!(f, "Re-dispatched {count} due reminder(s)."),
        }
    }
}
