#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use adhere_core::{
    error::Result,
    ports::{Clock, DispatchTimer, NotificationTransport},
    ScheduleError, Scheduler, SchedulerBuilder,
};
use jiff::Timestamp;
use tempfile::TempDir;

/// Clock pinned to a settable instant.
pub struct FixedClock(Mutex<Timestamp>);

impl FixedClock {
    pub fn at(instant: &str) -> Arc<Self> {
        Arc::new(Self(Mutex::new(instant.parse().expect("valid timestamp"))))
    }

    pub fn set(&self, instant: &str) {
        *self.0.lock().expect("clock lock") = instant.parse().expect("valid timestamp");
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.0.lock().expect("clock lock")
    }
}

/// Timer port that records every arming request.
#[derive(Default)]
pub struct RecordingTimer {
    pub armed: Mutex<Vec<(u64, Timestamp)>>,
}

impl DispatchTimer for RecordingTimer {
    fn schedule(&self, reminder_id: u64, eta: Timestamp) -> Result<()> {
        self.armed
            .lock()
            .expect("timer lock")
            .push((reminder_id, eta));
        Ok(())
    }
}

/// Transport that records sends and can be switched to fail.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(u64, String)>>,
    pub fail: AtomicBool,
}

impl NotificationTransport for RecordingTransport {
    fn send(&self, patient_id: u64, subject: &str, _body: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ScheduleError::TransportFailure {
                message: "transport down".into(),
            });
        }
        self.sent
            .lock()
            .expect("transport lock")
            .push((patient_id, subject.to_string()));
        Ok(())
    }
}

/// Helper function to create a test scheduler with injected ports.
pub async fn create_test_scheduler(
    clock: Arc<FixedClock>,
    timer: Arc<RecordingTimer>,
) -> (TempDir, PathBuf, Scheduler) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let scheduler = SchedulerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_clock(clock)
        .with_timer(timer as _)
        .build()
        .await
        .expect("Failed to create scheduler");
    (temp_dir, db_path, scheduler)
}
