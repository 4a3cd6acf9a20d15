//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! newtype wrappers here add contextual formatting for collections and
//! operation results. All output is markdown so the CLI's terminal renderer
//! and plain-text mode share one code path.

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

// Re-export commonly used types for convenience
pub use collections::{PlanSummaries, Reminders};
pub use datetime::LocalDateTime;
pub use results::{CheckInResult, CreateResult, SweepResult};
