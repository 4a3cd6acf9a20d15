//! Core library for the Adhere treatment-adherence application.
//!
//! This crate turns a clinician-authored treatment action ("take drug X
//! daily for 7 days") into an ordered sequence of time-stamped reminders,
//! tracks patient check-ins, and re-times the remaining schedule when a
//! check-in arrives late or a day is skipped, extending the plan instead of
//! silently dropping doses. An escalating notification loop keeps nagging
//! until acknowledgement, and a periodic sweep guarantees no due reminder
//! is lost even when a dispatch arm failed.
//!
//! # Architecture
//!
//! - [`models`]: the two persisted entities (action plans, reminders) and
//!   their projections
//! - [`db`]: SQLite persistence; plan activation and the check-in state
//!   machine commit as single transactions
//! - [`scheduler`]: the async [`Scheduler`] API interface layers call
//! - [`dispatch`]: notification dispatcher, in-process timer loop, and the
//!   due-reminder sweeper
//! - [`ports`]: injected clock, notification transport, and timer backend
//! - [`extract`]: contract for the external note-extraction service
//! - [`display`]: markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use adhere_core::{params::CreatePlan, models::Frequency, SchedulerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = SchedulerBuilder::new()
//!     .with_database_path(Some("adhere.db"))
//!     .build()
//!     .await?;
//!
//! // Activate a 7-day daily plan; prior plans for the patient are
//! // superseded in the same transaction.
//! let plan = scheduler
//!     .create_plan(&CreatePlan {
//!         patient_id: 1,
//!         note_id: None,
//!         action: "Take amoxicillin".to_string(),
//!         frequency: Frequency::Daily,
//!         custom_schedule: None,
//!         start_date: "2024-01-01".parse()?,
//!         duration_days: 7,
//!     })
//!     .await?;
//! println!("scheduled {} reminders", plan.reminders.len());
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod extract;
pub mod models;
pub mod params;
pub mod ports;
pub mod scheduler;

// Re-export commonly used types
pub use db::Database;
pub use dispatch::{Dispatcher, Sweeper, TimerQueue};
pub use display::{CheckInResult, CreateResult, PlanSummaries, Reminders, SweepResult};
pub use error::{Result, ScheduleError};
pub use models::{ActionPlan, CheckInOutcome, Frequency, PlanSummary, Reminder};
pub use params::{CheckIn, CreatePlan, Id, ListPlans, ListReminders};
pub use ports::{Clock, DispatchTimer, LogTransport, NotificationTransport, SystemClock};
pub use scheduler::{Scheduler, SchedulerBuilder};
