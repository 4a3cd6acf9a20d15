//! In-process timer backend for the dispatch port.
//!
//! [`TimerQueue`] implements [`DispatchTimer`] by enqueueing requests onto
//! an unbounded channel; [`run_dispatch_loop`] drains the channel, sleeps
//! each request out in its own task, and invokes the dispatcher at eta.
//! Timers are never hard-cancelled: supersession and completion are
//! observed by the dispatcher's pending check at fire time.

use std::sync::Arc;

use jiff::Timestamp;
use log::warn;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::Dispatcher;
use crate::{
    error::{Result, ScheduleError},
    ports::{DispatchTimer, SharedClock},
};

/// One armed dispatch request.
#[derive(Debug, Clone, Copy)]
pub struct DispatchAt {
    /// Reminder the dispatcher should fire for
    pub reminder_id: u64,
    /// When it should fire
    pub eta: Timestamp,
}

/// Channel-backed [`DispatchTimer`] implementation.
#[derive(Clone)]
pub struct TimerQueue {
    tx: UnboundedSender<DispatchAt>,
}

impl TimerQueue {
    /// Creates the queue and the receiving end for the dispatch loop.
    pub fn new() -> (Self, UnboundedReceiver<DispatchAt>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DispatchTimer for TimerQueue {
    fn schedule(&self, reminder_id: u64, eta: Timestamp) -> Result<()> {
        self.tx
            .send(DispatchAt { reminder_id, eta })
            .map_err(|_| ScheduleError::SchedulingUnavailable {
                message: "dispatch loop is not running".into(),
            })
    }
}

/// Drains armed requests and fires the dispatcher at each eta.
///
/// Runs until every [`TimerQueue`] handle is dropped. Each request sleeps in
/// its own task so a far-future reminder never blocks a near one.
pub async fn run_dispatch_loop(
    dispatcher: Arc<Dispatcher>,
    mut jobs: UnboundedReceiver<DispatchAt>,
    clock: SharedClock,
) {
    while let Some(job) = jobs.recv().await {
        let dispatcher = Arc::clone(&dispatcher);
        let delay = job.eta.duration_since(clock.now());

        tokio::spawn(async move {
            if delay.is_positive() {
                tokio::time::sleep(delay.unsigned_abs()).await;
            }
            if let Err(e) = dispatcher.notify(job.reminder_id).await {
                warn!("dispatch failed for reminder {}: {e}", job.reminder_id);
            }
        });
    }
}
