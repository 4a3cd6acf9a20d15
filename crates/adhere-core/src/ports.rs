//! Injected collaborator interfaces.
//!
//! The core decides *when* and *what* to notify; delivery transport, timer
//! backend, and the wall clock are all behind traits so they can be swapped
//! in tests and deployments. No process-wide singletons: every component
//! that needs one of these receives it explicitly.

use std::sync::Arc;

use jiff::Timestamp;
use log::info;

use crate::error::Result;

/// Supplies the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Delivers a notification to a patient.
///
/// Implementations must not panic on delivery failure; they return
/// [`ScheduleError::TransportFailure`](crate::error::ScheduleError) and the
/// dispatcher logs it and relies on the hourly re-arm. Whether delivery is
/// e-mail, push, or SMS is outside the core.
pub trait NotificationTransport: Send + Sync {
    /// Send one notification. At-least-once semantics: the same reminder
    /// may be sent repeatedly until it is checked in.
    fn send(&self, patient_id: u64, subject: &str, body: &str) -> Result<()>;
}

/// Transport that only logs, for local runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

impl NotificationTransport for LogTransport {
    fn send(&self, patient_id: u64, subject: &str, body: &str) -> Result<()> {
        info!("notify patient {patient_id}: {subject}\n{body}");
        Ok(())
    }
}

/// Arms a future `notify` call for a reminder (the job/timer backend port).
///
/// Used to arm the first reminder at materialization, the next reminder
/// after every check-in, and the dispatcher's own hourly escalation. Arming
/// failures are logged at the call site and recovered by the sweeper.
pub trait DispatchTimer: Send + Sync {
    /// Request that the dispatcher fire for `reminder_id` at `eta`.
    fn schedule(&self, reminder_id: u64, eta: Timestamp) -> Result<()>;
}

/// Timer that drops every request, for contexts with no dispatch loop
/// (one-shot CLI commands). The sweeper picks up anything due.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTimer;

impl DispatchTimer for NullTimer {
    fn schedule(&self, _reminder_id: u64, _eta: Timestamp) -> Result<()> {
        Ok(())
    }
}

/// Shared handle aliases used throughout the crate.
pub type SharedClock = Arc<dyn Clock>;
pub type SharedTransport = Arc<dyn NotificationTransport>;
pub type SharedTimer = Arc<dyn DispatchTimer>;
