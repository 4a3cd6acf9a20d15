//! Data models for action plans and reminders.
//!
//! These are the two persisted entities of the scheduling core, plus the
//! projections derived from them. Display implementations live in
//! [`crate::display::models`] to keep data structures separate from
//! presentation.

pub mod frequency;
pub mod outcome;
pub mod plan;
pub mod reminder;
pub mod summary;

#[cfg(test)]
mod tests;

// Re-export all public types at the models level
pub use frequency::Frequency;
pub use outcome::CheckInOutcome;
pub use plan::ActionPlan;
pub use reminder::Reminder;
pub use summary::PlanSummary;
