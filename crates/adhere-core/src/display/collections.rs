//! Collection wrapper types for list display.

use std::fmt;

use crate::models::{PlanSummary, Reminder};

/// Newtype wrapper for a list of plan summaries.
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")?;
            return Ok(());
        }

        writeln!(f, "# Plans")?;
        writeln!(f)?;
        for summary in &self.0 {
            write!(f, "{summary}")?;
        }

        Ok(())
    }
}

/// Newtype wrapper for a list of reminders.
pub struct Reminders(pub Vec<Reminder>);

impl fmt::Display for Reminders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No reminders found.")?;
            return Ok(());
        }

        writeln!(f, "# Reminders")?;
        writeln!(f)?;
        for reminder in &self.0 {
            write!(f, "{reminder}")?;
        }

        Ok(())
    }
}
