//! Display implementations for domain models.
//!
//! Markdown-formatted output with status icons, kept out of the model
//! definitions so data structures stay free of presentation concerns.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{ActionPlan, Frequency, PlanSummary, Reminder};

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Reminder {
    fn status_icon(&self) -> &'static str {
        if self.completed {
            "✓ Done"
        } else if self.is_active {
            "○ Pending"
        } else {
            "· Superseded"
        }
    }
}

impl fmt::Display for ActionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.action)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Patient: {}", self.patient_id)?;
        if let Some(note_id) = self.note_id {
            writeln!(f, "- Note: {note_id}")?;
        }
        writeln!(f, "- Frequency: {}", self.frequency)?;
        writeln!(f, "- Starts: {}", self.start_date)?;
        writeln!(f, "- Occurrences: {}", self.duration_days)?;
        writeln!(
            f,
            "- Status: {}",
            if self.is_active { "active" } else { "superseded" }
        )?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        if !self.reminders.is_empty() {
            writeln!(f, "\n## Reminders")?;
            writeln!(f)?;
            for reminder in &self.reminders {
                write!(f, "{reminder}")?;
            }
        } else {
            writeln!(f, "\nNo reminders in this plan.")?;
        }

        Ok(())
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. Day {} ({})",
            self.id,
            self.sequence_number,
            self.status_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- Due: {}", LocalDateTime(&self.scheduled_for))?;
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- Checked in: {}", LocalDateTime(completed_at))?;
        }
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_reminders > 0 {
            format!(" ({}/{})", self.completed_reminders, self.total_reminders)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.action, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Patient**: {}", self.patient_id)?;
        writeln!(
            f,
            "- **Schedule**: {} from {} for {} occurrence(s)",
            self.frequency, self.start_date, self.duration_days
        )?;
        if !self.is_active {
            writeln!(f, "- **Status**: superseded")?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}
